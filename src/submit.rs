//! Writing a draft to the repository: books first, then the source. A failed
//! step undoes the writes before it.

use tracing::{error, info, warn};

use crate::{
    draft::SourceDraft,
    error::{RemoteError, Result, SubmitError},
    remote::{read_existing, ContentStore},
    session::Session,
    types::{book::Book, collection::BookState},
};

/// Paths written by a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub books:  Vec<String>,
    pub source: String,
}

/// A completed write and how to undo it.
#[derive(Debug)]
enum Written {
    Created { path: String, sha: String },
    Updated { path: String, sha: String, previous: String },
}

impl Written {
    fn path(&self) -> &str {
        match self {
            Written::Created { path, .. } | Written::Updated { path, .. } => path,
        }
    }
}

impl<S: ContentStore> Session<S> {
    /// Validate and write `draft`. Validation failures return before any
    /// request is made and leave the draft untouched; on success the draft is
    /// reset for the next source.
    pub async fn submit(&mut self, draft: &mut SourceDraft) -> Result<Submission> {
        draft.validate(&self.books)?;

        let source = draft.to_source();
        let source_path = source.file_path(&self.repository.sources_dir);
        let source_json = serde_json::to_string(&source)?;

        let pending = self
            .books
            .pending()
            .into_iter()
            .map(|(book, state)| -> Result<(Book, BookState, String)> {
                Ok((book.clone(), state, serde_json::to_string(book)?))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut written = Vec::with_capacity(pending.len());
        for (book, state, content) in &pending {
            match self.write_book(book, *state, content).await {
                Ok(w) => written.push(w),
                Err(e) => return Err(self.compensate(e, written).await.into()),
            }
        }

        if let Err(source) = self
            .store
            .write(&source_path, &source_json, &source.commit_message(), None)
            .await
        {
            let cause = SubmitError::Source {
                path: source_path,
                source,
            };
            return Err(self.compensate(cause, written).await.into());
        }
        info!("Saved {source_path}.");

        for (book, ..) in &pending {
            self.books.mark_persisted(&book.key());
        }
        self.sources.insert(source.source.clone());
        draft.reset_after_submit();

        Ok(Submission {
            books:  written.iter().map(|w| w.path().to_string()).collect(),
            source: source_path,
        })
    }

    async fn write_book(
        &self,
        book: &Book,
        state: BookState,
        content: &str,
    ) -> std::result::Result<Written, SubmitError> {
        let path = book.file_path(&self.repository.books_dir);
        let fail = |source: RemoteError| SubmitError::Book {
            path: path.clone(),
            source,
        };

        // Modified books already have a file; created ones normally don't.
        let existing = match state {
            BookState::Created => None,
            _ => read_existing(&self.store, &path).await.map_err(fail)?,
        };
        let message = book.commit_message();
        let written = match existing {
            Some(previous) => {
                let sha = self
                    .store
                    .write(&path, content, &message, Some(&previous.sha))
                    .await
                    .map_err(fail)?;
                Written::Updated {
                    path: path.clone(),
                    sha,
                    previous: previous.content,
                }
            }
            None => {
                let sha = self
                    .store
                    .write(&path, content, &message, None)
                    .await
                    .map_err(fail)?;
                Written::Created {
                    path: path.clone(),
                    sha,
                }
            }
        };
        info!("Saved {path}.");
        Ok(written)
    }

    /// Undo `written` in reverse order. Files that could not be restored are
    /// reported alongside the original failure.
    async fn compensate(&self, cause: SubmitError, written: Vec<Written>) -> SubmitError {
        warn!("{cause}; rolling back {} written file(s)", written.len());
        let mut orphaned = vec![];
        for w in written.into_iter().rev() {
            let result = match &w {
                Written::Created { path, sha } => {
                    self.store
                        .delete(path, &format!("Revert: remove {path}"), sha)
                        .await
                }
                Written::Updated {
                    path,
                    sha,
                    previous,
                } => self
                    .store
                    .write(path, previous, &format!("Revert: restore {path}"), Some(sha))
                    .await
                    .map(|_| ()),
            };
            if let Err(e) = result {
                error!("Could not roll back {}: {e}", w.path());
                orphaned.push(w.path().to_string());
            }
        }
        if orphaned.is_empty() {
            cause
        } else {
            SubmitError::Compensation {
                cause: Box::new(cause),
                orphaned,
            }
        }
    }
}
