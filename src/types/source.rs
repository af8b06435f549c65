use serde::{Deserialize, Serialize};

use crate::{
    normalize::kebab_case,
    types::{book::BookKey, timestamp::parse_time_field},
};

fn is_false(b: &bool) -> bool {
    !*b
}

/// One mention of one book inside a source. Field names on disk follow the
/// existing records of the repository.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extract {
    #[serde(rename = "name")]
    pub book_key: BookKey,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub negative: bool,
    #[serde(rename = "__external", default, skip_serializing_if = "is_false")]
    pub is_external_quote: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unquote: bool,
    #[serde(rename = "extract", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl Extract {
    pub fn new(book_key: BookKey) -> Self {
        Self {
            book_key,
            ..Self::default()
        }
    }

    pub fn toggle_featured(&mut self) {
        self.featured = !self.featured;
    }

    pub fn toggle_negative(&mut self) {
        self.negative = !self.negative;
    }

    pub fn toggle_external(&mut self) {
        self.is_external_quote = !self.is_external_quote;
    }

    pub fn toggle_unquote(&mut self) {
        self.unquote = !self.unquote;
    }

    /// The quoted passage; blank clears it.
    pub fn set_text(&mut self, text: &str) {
        self.text = non_empty(text);
    }

    pub fn set_chapter(&mut self, chapter: &str) {
        self.chapter = non_empty(chapter);
    }

    /// The time field as typed, in seconds.
    pub fn set_time_text(&mut self, text: &str) {
        self.time = parse_time_field(text);
    }
}

/// A recorded mention of one or more books.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Profile name.
    pub name:     String,
    /// URL, or a book title for mentions inside books.
    pub source:   String,
    pub content:  String,
    pub date:     String,
    pub extracts: Vec<Extract>,
}

impl Source {
    pub fn file_path(&self, sources_dir: &str) -> String {
        format!(
            "{}/{}-{}.json",
            sources_dir.trim_end_matches('/'),
            kebab_case(&self.name),
            kebab_case(&self.source)
        )
    }

    pub fn commit_message(&self) -> String {
        format!("Add source for {}", self.name)
    }
}
