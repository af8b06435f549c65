//! Matching typed book details against the known books.

use crate::{
    normalize::normalize,
    types::{
        book::{main_title, Book, BookKey},
        collection::BookCollection,
    },
};

/// At most this many candidates are offered.
pub const CANDIDATE_LIMIT: usize = 10;

/// A typed title and author list, folded once so every book can be compared
/// against it cheaply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    title:   String,
    authors: Vec<String>,
}

impl Query {
    pub fn new(typed_title: &str, typed_authors: &[impl AsRef<str>]) -> Self {
        Self {
            title:   normalize(main_title(typed_title)),
            authors: typed_authors
                .iter()
                .map(|author| normalize(author.as_ref()))
                .filter(|slug| !slug.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.authors.is_empty()
    }

    /// Every typed author is part of some author of the book, and the typed
    /// main title is part of the book's main title.
    pub fn matches(&self, book: &Book) -> bool {
        if !self.authors.is_empty() {
            let book_authors = book
                .authors()
                .iter()
                .map(|author| normalize(author))
                .collect::<Vec<_>>();
            let all_found = self.authors.iter().all(|typed| {
                book_authors
                    .iter()
                    .any(|book_author| book_author.contains(typed.as_str()))
            });
            if !all_found {
                return false;
            }
        }
        normalize(book.main_title()).contains(self.title.as_str())
    }
}

/// Books matching the typed title and authors, in collection order, at most
/// [CANDIDATE_LIMIT]. Nothing typed gives nothing.
pub fn find_candidates<'a>(
    books: impl IntoIterator<Item = &'a Book>,
    typed_title: &str,
    typed_authors: &[impl AsRef<str>],
) -> Vec<&'a Book> {
    let query = Query::new(typed_title, typed_authors);
    if query.is_empty() {
        return vec![];
    }
    books
        .into_iter()
        .filter(|book| query.matches(book))
        .take(CANDIDATE_LIMIT)
        .collect()
}

/// The key an extract should use. Known keys are returned unchanged; older
/// records that stored only the title are upgraded when exactly one book
/// carries that title.
pub fn resolve_key(collection: &BookCollection, key: &BookKey) -> Option<BookKey> {
    if collection.contains(key) {
        return Some(key.clone());
    }
    let mut by_title = collection.iter().filter(|book| book.title == key.as_str());
    match (by_title.next(), by_title.next()) {
        (Some(book), None) => Some(book.key()),
        _ => None,
    }
}
