use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write};

use crate::{
    config::{Config, Styleable},
    normalize::kebab_case,
    traits::DisplayTerminal,
    types::author::AuthorField,
};

/// Identity of a book within the collection: the title followed by every
/// author, separated by newlines. Extracts refer to books by this key.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookKey(pub String);

impl BookKey {
    pub fn new(title: &str, authors: &[impl AsRef<str>]) -> Self {
        let authors = authors.iter().map(|a| a.as_ref()).collect::<Vec<_>>().join("\n");
        BookKey(format!("{title}\n{authors}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Title and author names encoded in the key. Blank author lines are dropped.
    pub fn split(&self) -> (&str, Vec<&str>) {
        let mut lines = self.0.split('\n');
        let title = lines.next().unwrap_or_default();
        (title, lines.filter(|line| !line.trim().is_empty()).collect())
    }
}

impl Display for BookKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (title, authors) = self.split();
        write!(f, "{} by {}", title, authors.join(", "))
    }
}

impl From<&str> for BookKey {
    fn from(s: &str) -> Self {
        BookKey(s.to_string())
    }
}

/// OpenLibrary cover ids are numbers, but hand edited records sometimes hold strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoverId {
    Numeric(u64),
    Text(String),
}

impl Display for CoverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoverId::Numeric(id) => write!(f, "{id}"),
            CoverId::Text(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cover {
    Isbn(String),
    OpenLibrary(CoverId),
}

impl Cover {
    /// Large cover image, e.g. `https://covers.openlibrary.org/b/isbn/0441013597-L.jpg`.
    pub fn url(&self, covers_base: &str) -> String {
        let base = covers_base.trim_end_matches('/');
        match self {
            Cover::Isbn(isbn) => format!("{base}/isbn/{isbn}-L.jpg"),
            Cover::OpenLibrary(id) => format!("{base}/id/{id}-L.jpg"),
        }
    }
}

impl Display for Cover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cover::Isbn(isbn) => write!(f, "ISBN {isbn}"),
            Cover::OpenLibrary(id) => write!(f, "OpenLibrary cover {id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title:  String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn:   Option<String>,
    #[serde(
        rename = "openLibraryId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub open_library_id: Option<CoverId>,
}

impl Book {
    pub fn new(title: impl Into<String>, authors: Vec<String>) -> Self {
        Self {
            title: title.into(),
            author: Some(AuthorField::Multiple(authors)),
            isbn: None,
            open_library_id: None,
        }
    }

    /// Author names; a book without an author field has none.
    pub fn authors(&self) -> &[String] {
        match &self.author {
            Some(author) => author.as_slice(),
            None => &[],
        }
    }

    pub fn key(&self) -> BookKey {
        BookKey::new(&self.title, self.authors())
    }

    pub fn main_title(&self) -> &str {
        main_title(&self.title)
    }

    /// "Dune by Frank Herbert"
    pub fn display_name(&self) -> String {
        format!("{} by {}", self.title, self.authors().join(", "))
    }

    /// Repository path of the standalone record for this book.
    pub fn file_path(&self, books_dir: &str) -> String {
        format!("{}/{}.json", books_dir.trim_end_matches('/'), kebab_case(&self.display_name()))
    }

    pub fn commit_message(&self) -> String {
        format!("Add book: {}", self.display_name())
    }

    pub fn has_title_and_author(&self) -> bool {
        !self.title.trim().is_empty() && self.author.as_ref().map_or(false, |a| !a.is_empty())
    }

    /// The chosen cover. An ISBN wins over an OpenLibrary cover id.
    pub fn cover(&self) -> Option<Cover> {
        match (&self.isbn, &self.open_library_id) {
            (Some(isbn), _) => Some(Cover::Isbn(isbn.clone())),
            (None, Some(id)) => Some(Cover::OpenLibrary(id.clone())),
            (None, None) => None,
        }
    }

    /// Replace the cover; `None` removes it.
    pub fn set_cover(&mut self, cover: Option<Cover>) {
        match cover {
            Some(Cover::Isbn(isbn)) => {
                self.isbn = Some(isbn);
                self.open_library_id = None;
            }
            Some(Cover::OpenLibrary(id)) => {
                self.isbn = None;
                self.open_library_id = Some(id);
            }
            None => {
                self.isbn = None;
                self.open_library_id = None;
            }
        }
    }
}

/// The main title of a "Series;Title: Subtitle" string: a leading series
/// segment before `;` is dropped, then the subtitle after the first `:`.
/// Titles without either separator are returned whole.
pub fn main_title(title: &str) -> &str {
    let mut parts = title.split(';');
    let first = parts.next().unwrap_or_default();
    let title = parts.next().unwrap_or(first);
    title.split(':').next().unwrap_or_default()
}

impl DisplayTerminal for Book {
    fn fmt(&self, f: &mut String, config: &Config) -> Result<()> {
        write!(f, "{}", self.title.style(&config.output_book.style_content))?;
        if !self.authors().is_empty() {
            let authors = self
                .authors()
                .iter()
                .map(|a| a.style(&config.output_author.style_content))
                .collect::<Vec<_>>()
                .join(&config.output_author.separator);
            write!(f, " {} {}", config.output_author.description, authors)?;
        }
        if let Some(cover) = self.cover() {
            write!(f, " {}", config.output_cover.format_str(cover))?;
        }
        Ok(())
    }
}
