//! Access to the content repository holding profiles, books and sources.

pub mod codec;
pub mod github;
pub mod memory;

use crate::error::RemoteError;

/// A file read from the repository, content already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub path:    String,
    pub content: String,
    /// Blob id; updating or deleting the file requires it.
    pub sha:     String,
}

/// Read and write access to the content repository. Every call is one
/// request; nothing is retried or batched.
#[allow(async_fn_in_trait)]
pub trait ContentStore {
    /// Login of the account the credentials belong to.
    async fn authenticate(&self) -> Result<String, RemoteError>;

    async fn read(&self, path: &str) -> Result<RemoteFile, RemoteError>;

    /// Create `path`, or update it when `sha` names the current blob.
    /// Returns the sha of the written blob.
    async fn write(
        &self,
        path: &str,
        content: &str,
        message: &str,
        sha: Option<&str>,
    ) -> Result<String, RemoteError>;

    async fn delete(&self, path: &str, message: &str, sha: &str) -> Result<(), RemoteError>;
}

/// The file at `path`, or `None` when it does not exist yet.
pub async fn read_existing<S: ContentStore>(
    store: &S,
    path: &str,
) -> Result<Option<RemoteFile>, RemoteError> {
    match store.read(path).await {
        Ok(file) => Ok(Some(file)),
        Err(RemoteError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
