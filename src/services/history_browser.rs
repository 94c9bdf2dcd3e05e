//! History browser.
//!
//! Lists and fetches previously persisted test files for a repository,
//! independent of any generation in the current session.
//!
//! List and content fetches may overlap. Each fetch takes a ticket from a
//! monotonically increasing sequence when it starts; when its response
//! arrives it is applied only if no newer fetch of the same kind has started
//! since. Older responses are dropped on arrival.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::domain::models::{HistoryContentState, HistoryListState, RepoKey};
use crate::domain::ports::AssuranceBackend;

const LIST_FAILED_MESSAGE: &str = "Failed to load file list.";
const CONTENT_FAILED_MESSAGE: &str = "Failed to load file content.";

pub struct HistoryBrowser {
    backend: Arc<dyn AssuranceBackend>,
    list_seq: AtomicU64,
    content_seq: AtomicU64,
    list: RwLock<HistoryListState>,
    content: RwLock<HistoryContentState>,
}

impl HistoryBrowser {
    pub fn new(backend: Arc<dyn AssuranceBackend>) -> Self {
        Self {
            backend,
            list_seq: AtomicU64::new(0),
            content_seq: AtomicU64::new(0),
            list: RwLock::new(HistoryListState::Idle),
            content: RwLock::new(HistoryContentState::NoSelection),
        }
    }

    /// Load the file list for `repo_key` and return the resulting state.
    ///
    /// An empty key clears the browser without a lookup. Switching to a
    /// different repository also clears the file selection.
    #[instrument(skip(self), fields(repo_key = %repo_key))]
    pub async fn list_files(&self, repo_key: &RepoKey) -> HistoryListState {
        let seq = self.list_seq.fetch_add(1, Ordering::AcqRel) + 1;

        if repo_key.is_empty() {
            self.clear_selection().await;
            *self.list.write().await = HistoryListState::Idle;
            return HistoryListState::Idle;
        }

        {
            let mut list = self.list.write().await;
            if matches!(list.repo_key(), Some(previous) if previous != repo_key) {
                self.clear_selection().await;
            }
            *list = HistoryListState::LoadingList {
                repo_key: repo_key.clone(),
            };
        }

        let outcome = self.backend.list_history(repo_key).await;

        let mut list = self.list.write().await;
        if self.list_seq.load(Ordering::Acquire) != seq {
            debug!(seq, "discarding superseded history list response");
            return list.clone();
        }
        *list = match outcome {
            Ok(entries) => {
                debug!(count = entries.len(), "history list loaded");
                HistoryListState::ListLoaded {
                    repo_key: repo_key.clone(),
                    entries,
                }
            }
            Err(err) => {
                warn!(error = %err, "history list failed");
                HistoryListState::ListLoadFailed {
                    repo_key: repo_key.clone(),
                    message: LIST_FAILED_MESSAGE.to_string(),
                }
            }
        };
        list.clone()
    }

    /// Select `filename` and load its content.
    ///
    /// The most recent selection wins: if another file is selected before
    /// this response arrives, the response is discarded and the returned
    /// state reflects the newer selection.
    #[instrument(skip(self), fields(repo_key = %repo_key))]
    pub async fn load_content(&self, repo_key: &RepoKey, filename: &str) -> HistoryContentState {
        if repo_key.is_empty() {
            return self.content_state().await;
        }

        let seq = self.content_seq.fetch_add(1, Ordering::AcqRel) + 1;
        *self.content.write().await = HistoryContentState::LoadingContent {
            filename: filename.to_string(),
        };

        let outcome = self.backend.fetch_history_file(repo_key, filename).await;

        let mut content = self.content.write().await;
        if self.content_seq.load(Ordering::Acquire) != seq {
            debug!(seq, "discarding content for deselected file");
            return content.clone();
        }
        *content = match outcome {
            Ok(file) => HistoryContentState::ContentLoaded(file),
            Err(err) => {
                warn!(error = %err, "history file failed to load");
                HistoryContentState::ContentLoadFailed {
                    filename: filename.to_string(),
                    message: CONTENT_FAILED_MESSAGE.to_string(),
                }
            }
        };
        content.clone()
    }

    pub async fn list_state(&self) -> HistoryListState {
        self.list.read().await.clone()
    }

    pub async fn content_state(&self) -> HistoryContentState {
        self.content.read().await.clone()
    }

    pub async fn selected(&self) -> Option<String> {
        self.content.read().await.selected().map(str::to_string)
    }

    async fn clear_selection(&self) {
        self.content_seq.fetch_add(1, Ordering::AcqRel);
        *self.content.write().await = HistoryContentState::NoSelection;
    }

    /// Drop all browsing state; in-flight responses are discarded on arrival.
    pub async fn reset(&self) {
        self.list_seq.fetch_add(1, Ordering::AcqRel);
        *self.list.write().await = HistoryListState::Idle;
        self.clear_selection().await;
    }
}
