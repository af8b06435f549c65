//! The source being entered, before it is submitted.

use std::fmt::Display;

use url::Url;

use crate::{
    error::ValidationError,
    reconcile::resolve_key,
    types::{
        book::BookKey,
        collection::BookCollection,
        date::parse_pasted_date,
        source::{Extract, Source},
    },
};

/// Host of `url` without a leading `www.`; `None` when it is not a URL, as
/// for mentions inside books.
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Domains that have a canonical replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainWarning {
    Twitter,
    YoutuBe,
}

impl DomainWarning {
    pub fn for_domain(domain: &str) -> Option<Self> {
        match domain {
            "twitter.com" => Some(Self::Twitter),
            "youtu.be" => Some(Self::YoutuBe),
            _ => None,
        }
    }

    pub fn canonical(&self) -> &'static str {
        match self {
            Self::Twitter => "x.com",
            Self::YoutuBe => "youtube.com",
        }
    }
}

impl Display for DomainWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Use {} instead.", self.canonical())
    }
}

/// Which per-extract fields make sense for a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractFields {
    /// Position in a video or podcast.
    pub time:    bool,
    /// Chapter, for mentions inside books.
    pub chapter: bool,
    /// The mention text.
    pub text:    bool,
}

impl ExtractFields {
    pub fn for_domain(domain: Option<&str>) -> Self {
        let is_post = domain == Some("x.com");
        Self {
            time:    domain.is_some() && !is_post,
            chapter: domain.is_none(),
            text:    !is_post,
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SourceDraft {
    /// Profile name.
    pub name:      String,
    pub url:       String,
    pub content:   String,
    pub date:      String,
    pub extracts:  Vec<Extract>,
    /// Set by the last duplicate check of `url`.
    pub duplicate: bool,
}

impl SourceDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Changing the URL invalidates the previous duplicate check.
    pub fn set_url(&mut self, url: &str) {
        let url = url.trim();
        if url != self.url {
            self.url = url.to_string();
            self.duplicate = false;
        }
    }

    pub fn domain(&self) -> Option<String> {
        domain_of(&self.url)
    }

    pub fn domain_warning(&self) -> Option<DomainWarning> {
        self.domain().as_deref().and_then(DomainWarning::for_domain)
    }

    pub fn fields(&self) -> ExtractFields {
        ExtractFields::for_domain(self.domain().as_deref())
    }

    /// Apply pasted text to the date. Returns false when the paste is left to
    /// normal typing.
    pub fn paste_date(&mut self, text: &str) -> bool {
        match parse_pasted_date(text) {
            Some(date) => {
                self.date = date;
                true
            }
            None => false,
        }
    }

    pub fn add_extract(&mut self, book_key: BookKey) -> usize {
        self.extracts.push(Extract::new(book_key));
        self.extracts.len() - 1
    }

    pub fn remove_extract(&mut self, index: usize) -> Option<Extract> {
        (index < self.extracts.len()).then(|| self.extracts.remove(index))
    }

    pub fn extract_mut(&mut self, index: usize) -> Option<&mut Extract> {
        self.extracts.get_mut(index)
    }

    /// Rewrite extract keys stored in the older title-only form.
    pub fn upgrade_legacy_keys(&mut self, books: &BookCollection) {
        for extract in &mut self.extracts {
            if let Some(key) = resolve_key(books, &extract.book_key) {
                extract.book_key = key;
            }
        }
    }

    /// Checks run before anything is sent, in the order they are reported.
    pub fn validate(&self, books: &BookCollection) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingUrl);
        }
        if self.date.trim().is_empty() {
            return Err(ValidationError::MissingDate);
        }
        if self.extracts.is_empty() {
            return Err(ValidationError::MissingExtracts);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingProfile);
        }
        if let Some((book, _)) = books
            .pending()
            .into_iter()
            .find(|(book, _)| !book.has_title_and_author())
        {
            return Err(ValidationError::IncompleteBook {
                key: book.key().0,
            });
        }
        if let Some(index) = self
            .extracts
            .iter()
            .position(|extract| !books.contains(&extract.book_key))
        {
            return Err(ValidationError::UnresolvedBook { index });
        }
        if self.duplicate {
            return Err(ValidationError::Duplicate);
        }
        if let Some(warning) = self.domain_warning() {
            return Err(ValidationError::NonCanonicalDomain(warning.canonical()));
        }
        Ok(())
    }

    pub fn to_source(&self) -> Source {
        Source {
            name:     self.name.trim().to_string(),
            source:   self.url.trim().to_string(),
            content:  self.content.clone(),
            date:     self.date.trim().to_string(),
            extracts: self.extracts.clone(),
        }
    }

    /// Ready the form for the next source by the same profile.
    pub fn reset_after_submit(&mut self) {
        *self = Self::new(std::mem::take(&mut self.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_drops_www() {
        assert_eq!(
            domain_of("https://www.youtube.com/watch?v=x").as_deref(),
            Some("youtube.com")
        );
        assert_eq!(domain_of("Dune"), None);
    }

    #[test]
    fn fields_follow_domain() {
        let post = ExtractFields::for_domain(Some("x.com"));
        assert!(!post.time && !post.text && !post.chapter);
        let book = ExtractFields::for_domain(None);
        assert!(book.chapter && book.text && !book.time);
        let video = ExtractFields::for_domain(Some("youtube.com"));
        assert!(video.time && video.text && !video.chapter);
    }
}
