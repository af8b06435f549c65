use tracing::{debug, warn};

use crate::{
    error::CollectionError,
    types::book::{Book, BookKey, Cover},
};

/// Whether a book still has to be written back to the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    /// Loaded from the repository and unchanged.
    Persisted,
    /// Created during this session.
    Created,
    /// Loaded from the repository and edited since (e.g. a new cover).
    Modified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    book:  Book,
    state: BookState,
}

/// The in-memory book list of a session. Keys are unique; insertion order is
/// the order candidates are offered in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookCollection {
    entries: Vec<Entry>,
}

impl BookCollection {
    /// Build from records loaded from the repository. Later records sharing a
    /// key with an earlier one are dropped.
    pub fn from_books(books: impl IntoIterator<Item = Book>) -> Self {
        let mut collection = Self::default();
        for book in books {
            if collection.contains(&book.key()) {
                warn!("Skipping duplicate book record {:?}", book.key().as_str());
                continue;
            }
            collection.entries.push(Entry {
                book,
                state: BookState::Persisted,
            });
        }
        collection
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.entries.iter().map(|entry| &entry.book)
    }

    pub fn contains(&self, key: &BookKey) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &BookKey) -> Option<&Book> {
        self.iter().find(|book| &book.key() == key)
    }

    pub fn state(&self, key: &BookKey) -> Option<BookState> {
        self.entries
            .iter()
            .find(|entry| &entry.book.key() == key)
            .map(|entry| entry.state)
    }

    /// Add a book created by the user and return its key.
    pub fn add(&mut self, book: Book) -> Result<BookKey, CollectionError> {
        if book.title.trim().is_empty() {
            return Err(CollectionError::MissingTitle);
        }
        let key = book.key();
        if self.contains(&key) {
            return Err(CollectionError::DuplicateKey(key.0));
        }
        debug!("Adding book {:?}", key.as_str());
        self.entries.push(Entry {
            book,
            state: BookState::Created,
        });
        Ok(key)
    }

    /// Set or remove the cover of a book. Covers do not take part in the key.
    pub fn set_cover(&mut self, key: &BookKey, cover: Option<Cover>) -> Result<(), CollectionError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| &entry.book.key() == key)
            .ok_or_else(|| CollectionError::UnknownKey(key.0.clone()))?;
        if entry.book.cover() == cover {
            return Ok(());
        }
        entry.book.set_cover(cover);
        if entry.state == BookState::Persisted {
            entry.state = BookState::Modified;
        }
        Ok(())
    }

    /// Books that have to be written on the next submission, in insertion order.
    pub fn pending(&self) -> Vec<(&Book, BookState)> {
        self.entries
            .iter()
            .filter(|entry| entry.state != BookState::Persisted)
            .map(|entry| (&entry.book, entry.state))
            .collect()
    }

    /// Newly created books only.
    pub fn created(&self) -> impl Iterator<Item = &Book> {
        self.entries
            .iter()
            .filter(|entry| entry.state == BookState::Created)
            .map(|entry| &entry.book)
    }

    pub fn mark_persisted(&mut self, key: &BookKey) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| &entry.book.key() == key) {
            entry.state = BookState::Persisted;
        }
    }
}
