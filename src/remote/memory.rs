//! Stores that keep writes in memory: a standalone store, and an overlay that
//! reads through to the real repository without ever writing to it.

use std::{
    collections::{BTreeMap, HashSet},
    sync::Mutex,
};

use tracing::info;

use crate::{
    error::RemoteError,
    remote::{ContentStore, RemoteFile},
};

/// A request as it reached a store, for inspecting what a run would send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Authenticate,
    Read(String),
    Write { path: String, message: String },
    Delete(String),
}

#[derive(Debug, Default)]
struct Inner {
    files:           BTreeMap<String, (String, String)>,
    calls:           Vec<Call>,
    failing:         HashSet<String>,
    failing_deletes: HashSet<String>,
    next_sha:        u64,
}

#[derive(Debug)]
pub struct MemoryStore {
    login: Option<String>,
    inner: Mutex<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("offline")
    }
}

impl MemoryStore {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: Some(login.into()),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// A store whose credentials are rejected.
    pub fn unauthorized() -> Self {
        Self {
            login: None,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&self, path: &str, content: &str) -> String {
        let mut inner = self.lock();
        inner.next_sha += 1;
        let sha = format!("{:040x}", inner.next_sha);
        inner
            .files
            .insert(path.to_string(), (content.to_string(), sha.clone()));
        sha
    }

    pub fn remove(&self, path: &str) -> bool {
        self.lock().files.remove(path).is_some()
    }

    /// Make every write and delete of `path` fail with a conflict.
    pub fn fail_on(&self, path: &str) {
        self.lock().failing.insert(path.to_string());
    }

    /// Make deletes of `path` fail while writes still succeed.
    pub fn fail_delete_on(&self, path: &str) {
        self.lock().failing_deletes.insert(path.to_string());
    }

    pub fn content(&self, path: &str) -> Option<String> {
        self.lock().files.get(path).map(|(content, _)| content.clone())
    }

    pub fn paths(&self) -> Vec<String> {
        self.lock().files.keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    fn log(&self, call: Call) {
        self.lock().calls.push(call);
    }

    fn is_failing(&self, path: &str) -> bool {
        self.lock().failing.contains(path)
    }
}

impl ContentStore for MemoryStore {
    async fn authenticate(&self) -> Result<String, RemoteError> {
        self.log(Call::Authenticate);
        self.login.clone().ok_or(RemoteError::Unauthorized)
    }

    async fn read(&self, path: &str) -> Result<RemoteFile, RemoteError> {
        self.log(Call::Read(path.to_string()));
        self.lock()
            .files
            .get(path)
            .map(|(content, sha)| RemoteFile {
                path:    path.to_string(),
                content: content.clone(),
                sha:     sha.clone(),
            })
            .ok_or_else(|| RemoteError::NotFound(path.to_string()))
    }

    async fn write(
        &self,
        path: &str,
        content: &str,
        message: &str,
        sha: Option<&str>,
    ) -> Result<String, RemoteError> {
        self.log(Call::Write {
            path:    path.to_string(),
            message: message.to_string(),
        });
        if self.is_failing(path) {
            return Err(RemoteError::Conflict(path.to_string()));
        }
        let current = self.lock().files.get(path).map(|(_, sha)| sha.clone());
        if current.as_deref() != sha {
            return Err(RemoteError::Conflict(path.to_string()));
        }
        Ok(self.insert(path, content))
    }

    async fn delete(&self, path: &str, _message: &str, sha: &str) -> Result<(), RemoteError> {
        self.log(Call::Delete(path.to_string()));
        let mut inner = self.lock();
        if inner.failing.contains(path) || inner.failing_deletes.contains(path) {
            return Err(RemoteError::Conflict(path.to_string()));
        }
        let current = inner.files.get(path).map(|(_, current)| current.clone());
        match current {
            Some(current) if current == sha => {
                inner.files.remove(path);
                Ok(())
            }
            Some(_) => Err(RemoteError::Conflict(path.to_string())),
            None => Err(RemoteError::NotFound(path.to_string())),
        }
    }
}

/// Reads go to the wrapped store unless the path was written during the run;
/// writes and deletes only ever reach the in-memory overlay.
pub struct DryRunStore<S> {
    inner:   S,
    overlay: MemoryStore,
    deleted: Mutex<HashSet<String>>,
}

impl<S: ContentStore> DryRunStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            overlay: MemoryStore::default(),
            deleted: Mutex::new(HashSet::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Everything the run would have written, by path.
    pub fn written(&self) -> Vec<(String, String)> {
        self.overlay
            .paths()
            .into_iter()
            .filter_map(|path| self.overlay.content(&path).map(|content| (path, content)))
            .collect()
    }

    fn deleted(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.deleted.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<S: ContentStore> ContentStore for DryRunStore<S> {
    async fn authenticate(&self) -> Result<String, RemoteError> {
        self.inner.authenticate().await
    }

    async fn read(&self, path: &str) -> Result<RemoteFile, RemoteError> {
        if self.deleted().contains(path) {
            return Err(RemoteError::NotFound(path.to_string()));
        }
        match self.overlay.read(path).await {
            Ok(file) => Ok(file),
            Err(RemoteError::NotFound(_)) => self.inner.read(path).await,
            Err(e) => Err(e),
        }
    }

    async fn write(
        &self,
        path: &str,
        content: &str,
        message: &str,
        _sha: Option<&str>,
    ) -> Result<String, RemoteError> {
        info!("Dry run: would write {path} ({message})");
        self.deleted().remove(path);
        Ok(self.overlay.insert(path, content))
    }

    async fn delete(&self, path: &str, message: &str, _sha: &str) -> Result<(), RemoteError> {
        info!("Dry run: would delete {path} ({message})");
        self.overlay.remove(path);
        self.deleted().insert(path.to_string());
        Ok(())
    }
}
