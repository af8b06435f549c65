//! A constrained text input: the only edits are inserting text, deleting one
//! character either side of the cursor, undo and redo. Formatting, drops and
//! other rich edits are rejected.

use crate::types::timestamp::{find_first_timestamp, parse_time_to_seconds, remove_timestamps};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Insert(String),
    DeleteBackward,
    DeleteForward,
    Undo,
    Redo,
}

impl EditOp {
    /// Map an input event type as reported by editing surfaces
    /// (`insertText`, `deleteContentBackward`, `historyUndo`, ...) to an
    /// operation. Every other type gives `None` and must be dropped.
    pub fn from_input_type(input_type: &str, data: Option<&str>) -> Option<Self> {
        match input_type {
            "insertText" => Some(EditOp::Insert(data.unwrap_or_default().to_string())),
            "deleteContentBackward" => Some(EditOp::DeleteBackward),
            "deleteContentForward" => Some(EditOp::DeleteForward),
            "historyUndo" => Some(EditOp::Undo),
            "historyRedo" => Some(EditOp::Redo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// Titles, authors, URLs: line breaks become spaces.
    Single,
    /// Mentions and chapters: line breaks are kept.
    Multi,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    text:   String,
    cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    text:   String,
    /// Byte offset, always on a char boundary.
    cursor: usize,
    mode:   LineMode,
    undo:   Vec<Snapshot>,
    redo:   Vec<Snapshot>,
}

fn collapse_line_breaks(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_break = false;
    for c in s.chars() {
        if c == '\n' || c == '\r' {
            if !in_break {
                out.push(' ');
            }
            in_break = true;
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out
}

impl TextField {
    pub fn new(mode: LineMode) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            mode,
            undo: vec![],
            redo: vec![],
        }
    }

    pub fn single_line() -> Self {
        Self::new(LineMode::Single)
    }

    pub fn multi_line() -> Self {
        Self::new(LineMode::Multi)
    }

    /// A field pre-filled with `text`, cursor at the end and no history.
    pub fn with_value(mode: LineMode, text: &str) -> Self {
        let mut field = Self::new(mode);
        field.text = field.clean(text);
        field.cursor = field.text.len();
        field
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    fn clean(&self, s: &str) -> String {
        match self.mode {
            LineMode::Single => collapse_line_breaks(s),
            LineMode::Multi => s.replace("\r\n", "\n").replace('\r', "\n"),
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text:   self.text.clone(),
            cursor: self.cursor,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.text = snapshot.text;
        self.cursor = snapshot.cursor;
    }

    fn record(&mut self) {
        self.undo.push(self.snapshot());
        self.redo.clear();
    }

    /// Apply an edit. Returns whether the content changed.
    pub fn apply(&mut self, op: EditOp) -> bool {
        match op {
            EditOp::Insert(s) => {
                let s = self.clean(&s);
                if s.is_empty() {
                    return false;
                }
                self.record();
                self.text.insert_str(self.cursor, &s);
                self.cursor += s.len();
                true
            }
            EditOp::DeleteBackward => {
                let Some(c) = self.text[..self.cursor].chars().next_back() else {
                    return false;
                };
                self.record();
                self.cursor -= c.len_utf8();
                self.text.remove(self.cursor);
                true
            }
            EditOp::DeleteForward => {
                if self.cursor >= self.text.len() {
                    return false;
                }
                self.record();
                self.text.remove(self.cursor);
                true
            }
            EditOp::Undo => match self.undo.pop() {
                Some(previous) => {
                    self.redo.push(self.snapshot());
                    self.restore(previous);
                    true
                }
                None => false,
            },
            EditOp::Redo => match self.redo.pop() {
                Some(next) => {
                    self.undo.push(self.snapshot());
                    self.restore(next);
                    true
                }
                None => false,
            },
        }
    }

    /// Apply an edit by its input type name; unknown types are rejected
    /// without touching the field.
    pub fn apply_input(&mut self, input_type: &str, data: Option<&str>) -> bool {
        match EditOp::from_input_type(input_type, data) {
            Some(op) => self.apply(op),
            None => false,
        }
    }

    /// The Enter key: a line break in multi line fields, nothing otherwise.
    pub fn line_break(&mut self) -> bool {
        match self.mode {
            LineMode::Multi => self.apply(EditOp::Insert("\n".into())),
            LineMode::Single => false,
        }
    }

    /// Paste plain text as a single insertion.
    pub fn paste(&mut self, clipboard: &str) -> bool {
        self.apply(EditOp::Insert(clipboard.to_string()))
    }

    /// Paste a transcript into a mention field. A leading timestamp is taken
    /// out of the text and returned in seconds.
    pub fn paste_transcript(&mut self, clipboard: &str) -> Option<i64> {
        match find_first_timestamp(clipboard) {
            Some(timestamp) => {
                let seconds = parse_time_to_seconds(timestamp);
                self.paste(&remove_timestamps(clipboard));
                Some(seconds)
            }
            None => {
                self.paste(clipboard);
                None
            }
        }
    }

    /// Replace everything, as one undoable edit.
    pub fn replace_all(&mut self, text: &str) -> bool {
        let text = self.clean(text);
        if text == self.text {
            return false;
        }
        self.record();
        self.text = text;
        self.cursor = self.text.len();
        true
    }

    pub fn move_left(&mut self) {
        if let Some(c) = self.text[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }
}
