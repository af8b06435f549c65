//! Cover and edition lookups against OpenLibrary.

pub mod schema;

use std::collections::HashMap;

use tracing::debug;

use crate::{
    config::ServiceConfig,
    error::Result,
    normalize::strip_punctuation,
    types::book::{Book, Cover, CoverId},
};

use self::schema::{Edition, SearchDoc, SearchResponse};

pub struct OpenLibrary {
    client:     reqwest::Client,
    search_url: String,
    books_url:  String,
    covers_url: String,
}

impl OpenLibrary {
    pub fn new(services: &ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&services.user_agent)
            .build()?;
        Ok(Self {
            client,
            search_url: services.openlibrary_search.clone(),
            books_url: services.openlibrary_books.clone(),
            covers_url: services.openlibrary_covers.clone(),
        })
    }

    /// Search by main title and first author, both without punctuation.
    pub async fn search(&self, book: &Book) -> Result<Vec<SearchDoc>> {
        let title = strip_punctuation(book.main_title());
        let author = strip_punctuation(book.authors().first().map_or("", String::as_str));
        let mut params = HashMap::new();
        params.insert("title", title.trim());
        params.insert("author", author.trim());
        debug!("Searching OpenLibrary for {params:?}");
        let resp = self
            .client
            .get(&self.search_url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let response: SearchResponse = serde_json::from_str(&resp)?;
        debug!("{} results", response.num_found);
        Ok(response.docs)
    }

    pub async fn covers(&self, book: &Book) -> Result<Vec<Cover>> {
        Ok(cover_choices(&self.search(book).await?))
    }

    /// Cover of the best search result; `None` when it has no cover.
    pub async fn first_cover(&self, book: &Book) -> Result<Option<Cover>> {
        Ok(first_cover(&self.search(book).await?))
    }

    pub fn cover_url(&self, cover: &Cover) -> String {
        cover.url(&self.covers_url)
    }

    /// Title and authors of the edition with `isbn`, if OpenLibrary knows it.
    pub async fn edition_by_isbn(&self, isbn: &str) -> Result<Option<Book>> {
        let bibkey = format!("ISBN:{isbn}");
        let mut params = HashMap::new();
        params.insert("bibkeys", bibkey.as_str());
        params.insert("jscmd", "data");
        params.insert("format", "json");
        let resp = self
            .client
            .get(&self.books_url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let mut editions: HashMap<String, Edition> = serde_json::from_str(&resp)?;
        Ok(editions
            .remove(&bibkey)
            .and_then(|edition| edition_to_book(edition, isbn)))
    }
}

/// Every distinct ISBN of the results, then every distinct cover id.
pub fn cover_choices(docs: &[SearchDoc]) -> Vec<Cover> {
    let mut choices: Vec<Cover> = vec![];
    let isbns = docs
        .iter()
        .flat_map(|doc| doc.isbn.iter())
        .filter(|isbn| !isbn.trim().is_empty())
        .map(|isbn| Cover::Isbn(isbn.trim().to_string()));
    let ids = docs
        .iter()
        .filter_map(|doc| doc.cover_i)
        .map(|id| Cover::OpenLibrary(CoverId::Numeric(id)));
    for cover in isbns.chain(ids) {
        if !choices.contains(&cover) {
            choices.push(cover);
        }
    }
    choices
}

pub fn first_cover(docs: &[SearchDoc]) -> Option<Cover> {
    docs.first()
        .and_then(|doc| doc.cover_i)
        .map(|id| Cover::OpenLibrary(CoverId::Numeric(id)))
}

fn edition_to_book(edition: Edition, isbn: &str) -> Option<Book> {
    let title = edition.title?;
    let authors = edition
        .authors
        .unwrap_or_default()
        .into_iter()
        .map(|author| author.name)
        .collect();
    let mut book = Book::new(title, authors);
    book.set_cover(Some(Cover::Isbn(isbn.to_string())));
    Some(book)
}
