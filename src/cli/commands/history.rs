//! `trinity history`: browse previously generated test files.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;
use tracing::Instrument;

use crate::cli::output::{create_spinner, output, CommandOutput, ProgressBarExt, TableFormatter};
use crate::cli::{unlocked_session, GlobalArgs};
use crate::domain::errors::ClientError;
use crate::domain::models::{
    Config, HistoryContentState, HistoryEntry, HistoryListState, RepoKey,
};

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommands,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List the test files stored for a repository
    List {
        /// Repository URL
        repo_url: String,
    },
    /// Print one stored test file
    Show {
        /// Repository URL
        repo_url: String,
        /// File name as shown by `history list`
        filename: String,
    },
}

#[derive(Debug, Serialize)]
pub struct HistoryListOutput {
    pub repo_key: RepoKey,
    pub files: Vec<HistoryEntry>,
    pub total: usize,
}

impl CommandOutput for HistoryListOutput {
    fn to_human(&self) -> String {
        if self.files.is_empty() {
            return format!("No history found for {}.", self.repo_key);
        }
        format!(
            "Found {} test file(s) for {}:\n{}",
            self.total,
            style(&self.repo_key).bold(),
            TableFormatter::new().format_history(&self.files)
        )
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryFileOutput {
    pub repo_key: RepoKey,
    pub filename: String,
    pub content: String,
}

impl CommandOutput for HistoryFileOutput {
    fn to_human(&self) -> String {
        format!(
            "{}\n\n{}",
            style(&self.filename).bold().underlined(),
            self.content.trim_end()
        )
    }
}

fn require_key(repo_url: &str) -> Result<RepoKey> {
    let repo_key = RepoKey::derive(repo_url);
    if repo_key.is_empty() {
        return Err(ClientError::InvalidRequest(format!(
            "no repository key can be derived from '{repo_url}'"
        ))
        .into());
    }
    Ok(repo_key)
}

pub async fn execute(args: HistoryArgs, global: &GlobalArgs, config: &Config) -> Result<()> {
    match args.command {
        HistoryCommands::List { repo_url } => {
            let repo_key = require_key(&repo_url)?;
            let session = unlocked_session(global, config).await?;
            let browser = session.history().await?;

            let spinner = create_spinner("Loading history...", global.json);
            let state = browser
                .list_files(&repo_key)
                .instrument(session.span())
                .await;
            session.end().await;

            match state {
                HistoryListState::ListLoaded { repo_key, entries } => {
                    spinner.finish_and_clear();
                    let result = HistoryListOutput {
                        repo_key,
                        total: entries.len(),
                        files: entries,
                    };
                    output(&result, global.json);
                    Ok(())
                }
                HistoryListState::ListLoadFailed { message, .. } => {
                    spinner.finish_error("Could not load history");
                    Err(ClientError::HistoryListFailed(message).into())
                }
                HistoryListState::Idle | HistoryListState::LoadingList { .. } => {
                    spinner.finish_and_clear();
                    Err(ClientError::HistoryListFailed(
                        "history lookup did not complete".to_string(),
                    )
                    .into())
                }
            }
        }
        HistoryCommands::Show { repo_url, filename } => {
            let repo_key = require_key(&repo_url)?;
            let session = unlocked_session(global, config).await?;
            let browser = session.history().await?;

            let spinner = create_spinner(format!("Loading {filename}..."), global.json);
            let state = browser
                .load_content(&repo_key, &filename)
                .instrument(session.span())
                .await;
            session.end().await;

            match state {
                HistoryContentState::ContentLoaded(file) => {
                    spinner.finish_and_clear();
                    let result = HistoryFileOutput {
                        repo_key,
                        filename: file.filename,
                        content: file.content,
                    };
                    output(&result, global.json);
                    Ok(())
                }
                HistoryContentState::ContentLoadFailed { message, .. } => {
                    spinner.finish_error("Could not load file");
                    Err(ClientError::HistoryContentFailed(format!("{filename}: {message}")).into())
                }
                HistoryContentState::NoSelection | HistoryContentState::LoadingContent { .. } => {
                    spinner.finish_and_clear();
                    Err(ClientError::HistoryContentFailed(
                        "content lookup did not complete".to_string(),
                    )
                    .into())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_message() {
        let result = HistoryListOutput {
            repo_key: RepoKey::derive("Foo_Bar"),
            files: vec![],
            total: 0,
        };

        assert_eq!(result.to_human(), "No history found for Foo_Bar.");
        assert_eq!(result.to_json()["files"], serde_json::json!([]));
    }

    #[test]
    fn test_list_json_shape() {
        let result = HistoryListOutput {
            repo_key: RepoKey::derive("Foo_Bar"),
            files: vec![HistoryEntry::new("test_a.py")],
            total: 1,
        };

        assert_eq!(
            result.to_json(),
            serde_json::json!({"repo_key": "Foo_Bar", "files": ["test_a.py"], "total": 1})
        );
    }

    #[test]
    fn test_require_key() {
        assert_eq!(require_key("https://x/y/Foo-Bar.git").unwrap().as_str(), "Foo_Bar");
        assert!(require_key("https://x/y/bad name").is_err());
    }
}
