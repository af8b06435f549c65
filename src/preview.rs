use serde::Serialize;

use crate::{
    draft::SourceDraft,
    error::Result,
    types::{book::Book, collection::BookCollection, source::Source},
};

/// Everything a submission would write, for review before sending.
#[derive(Debug, Serialize)]
pub struct Preview<'a> {
    source:    Source,
    new_books: Vec<&'a Book>,
}

impl<'a> Preview<'a> {
    pub fn new(draft: &SourceDraft, books: &'a BookCollection) -> Self {
        Self {
            source:    draft.to_source(),
            new_books: books.pending().into_iter().map(|(book, _)| book).collect(),
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn new_books(&self) -> &[&'a Book] {
        &self.new_books
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
