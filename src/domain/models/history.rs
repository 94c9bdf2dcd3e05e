//! Test history domain model.

use serde::{Deserialize, Serialize};

use super::repo_key::RepoKey;

/// A previously persisted test file, as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryEntry {
    pub filename: String,
}

impl HistoryEntry {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFileContent {
    pub filename: String,
    pub content: String,
}

/// State of the file list for the current repository.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HistoryListState {
    /// No repository selected
    #[default]
    Idle,
    LoadingList { repo_key: RepoKey },
    /// Entries in backend order; empty means "no history found"
    ListLoaded {
        repo_key: RepoKey,
        entries: Vec<HistoryEntry>,
    },
    ListLoadFailed { repo_key: RepoKey, message: String },
}

impl HistoryListState {
    pub fn repo_key(&self) -> Option<&RepoKey> {
        match self {
            Self::Idle => None,
            Self::LoadingList { repo_key }
            | Self::ListLoaded { repo_key, .. }
            | Self::ListLoadFailed { repo_key, .. } => Some(repo_key),
        }
    }

    pub fn entries(&self) -> Option<&[HistoryEntry]> {
        match self {
            Self::ListLoaded { entries, .. } => Some(entries),
            _ => None,
        }
    }
}

/// State of the selected history file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HistoryContentState {
    #[default]
    NoSelection,
    LoadingContent { filename: String },
    ContentLoaded(HistoryFileContent),
    ContentLoadFailed { filename: String, message: String },
}

impl HistoryContentState {
    pub fn selected(&self) -> Option<&str> {
        match self {
            Self::NoSelection => None,
            Self::LoadingContent { filename } | Self::ContentLoadFailed { filename, .. } => {
                Some(filename)
            }
            Self::ContentLoaded(file) => Some(&file.filename),
        }
    }
}
