//! Error types shared by the library.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Submission failed: {0}")]
    Submit(#[from] SubmitError),

    #[error("Collection error: {0}")]
    Collection(#[from] CollectionError),

    #[error("Malformed record on line {line}: {source}")]
    MalformedLine {
        line: usize,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a draft is rejected before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("URL is required.")]
    MissingUrl,

    #[error("Date is required.")]
    MissingDate,

    #[error("At least one book is required.")]
    MissingExtracts,

    #[error("Profile is required.")]
    MissingProfile,

    #[error("All books must have a title and author.")]
    IncompleteBook { key: String },

    #[error("Extract {index} does not refer to a known book.")]
    UnresolvedBook { index: usize },

    #[error("This source is already recorded.")]
    Duplicate,

    #[error("Use {0} instead.")]
    NonCanonicalDomain(&'static str),
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict writing {0}")]
    Conflict(String),

    #[error("Unexpected status {status} for {path}")]
    Status { status: u16, path: String },

    #[error("Content of {path} is not valid base64: {reason}")]
    Encoding { path: String, reason: String },

    #[error("Invalid API address: {0}")]
    Url(#[from] url::ParseError),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failures while opening a session. Some of them invalidate cached credentials.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Authentication failed: {0}")]
    Authentication(#[source] RemoteError),

    #[error("Loading profiles failed.")]
    Profiles(#[source] Box<Error>),

    #[error("Loading books failed.")]
    Books(#[source] Box<Error>),
}

impl SessionError {
    pub fn clears_credentials(&self) -> bool {
        match self {
            SessionError::Authentication(_) | SessionError::Books(_) => true,
            SessionError::Profiles(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Saving book {path} failed: {source}")]
    Book {
        path: String,
        #[source]
        source: RemoteError,
    },

    #[error("Saving source {path} failed: {source}")]
    Source {
        path: String,
        #[source]
        source: RemoteError,
    },

    /// Rolling back a failed submission did not complete; `orphaned` are the
    /// files left behind in the repository.
    #[error("{cause}; rollback left orphaned files: {}", orphaned.join(", "))]
    Compensation {
        cause: Box<SubmitError>,
        orphaned: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("A book with key {0:?} already exists")]
    DuplicateKey(String),

    #[error("No book with key {0:?}")]
    UnknownKey(String),

    #[error("A book needs a title")]
    MissingTitle,
}
