//! Application state of one editing session: who is logged in and which
//! profiles and books are known.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{
    config::RepositoryConfig,
    duplicate::SourceIndex,
    error::{Error, SessionError},
    reconcile::find_candidates,
    remote::{codec::parse_json_lines, ContentStore},
    types::{
        book::Book,
        collection::BookCollection,
        profile::{suggest_profiles, Profile},
    },
};

/// The access token, cached on disk between runs.
#[derive(Debug, Clone)]
pub struct Credentials {
    location: PathBuf,
}

impl Credentials {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn load(&self) -> std::io::Result<Option<String>> {
        match fs::read_to_string(&self.location) {
            Ok(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn store(&self, token: &str) -> std::io::Result<()> {
        if let Some(parent) = self.location.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.location, token.trim())?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.location, fs::Permissions::from_mode(0o600))?;
        }
        debug!("Cached credentials at {}", self.location.display());
        Ok(())
    }

    pub fn clear(&self) -> std::io::Result<()> {
        match fs::remove_file(&self.location) {
            Ok(()) => {
                info!("Cleared cached credentials.");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Everything loaded after a successful login. Created by [Session::start];
/// dropping it ends the session.
pub struct Session<S> {
    pub(crate) store:      S,
    pub(crate) repository: RepositoryConfig,
    pub(crate) username:   String,
    pub(crate) profiles:   Vec<Profile>,
    pub(crate) books:      BookCollection,
    pub(crate) sources:    SourceIndex,
}

impl<S: ContentStore> Session<S> {
    /// Authenticate, then load profiles and books. On error the caller clears
    /// cached credentials if [SessionError::clears_credentials] says so.
    pub async fn start(store: S, repository: RepositoryConfig) -> Result<Self, SessionError> {
        let username = store
            .authenticate()
            .await
            .map_err(SessionError::Authentication)?;

        let profiles = load_records::<S, Profile>(&store, &repository.profiles_path)
            .await
            .map_err(|e| SessionError::Profiles(Box::new(e)))?;
        info!("Loaded {} profiles.", profiles.len());

        let books = load_records::<S, Book>(&store, &repository.books_path)
            .await
            .map_err(|e| SessionError::Books(Box::new(e)))?;
        let books = BookCollection::from_books(books);
        info!("Loaded {} books.", books.len());

        Ok(Self {
            store,
            repository,
            username,
            profiles,
            books,
            sources: SourceIndex::default(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn repository(&self) -> &RepositoryConfig {
        &self.repository
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn books(&self) -> &BookCollection {
        &self.books
    }

    pub fn books_mut(&mut self) -> &mut BookCollection {
        &mut self.books
    }

    pub fn suggest_profiles(&self, typed: &str) -> Vec<&Profile> {
        suggest_profiles(&self.profiles, typed)
    }

    pub fn find_candidates(&self, typed_title: &str, typed_authors: &[String]) -> Vec<&Book> {
        find_candidates(self.books.iter(), typed_title, typed_authors)
    }

    /// Whether `url` is already recorded. The index is fetched again on every
    /// check so sources added elsewhere are seen.
    pub async fn check_duplicate(&mut self, url: &str) -> Result<bool, Error> {
        let index = self.store.read(&self.repository.sources_index).await?;
        self.sources = SourceIndex::parse(&index.content);
        let duplicate = self.sources.contains(url);
        if duplicate {
            warn!("{url} is already recorded.");
        }
        Ok(duplicate)
    }

    /// End the session and hand back the store.
    pub fn into_store(self) -> S {
        self.store
    }
}

async fn load_records<S, T>(store: &S, path: &str) -> Result<Vec<T>, Error>
where
    S: ContentStore,
    T: serde::de::DeserializeOwned,
{
    let file = store.read(path).await?;
    parse_json_lines(&file.content)
}
