//! `trinity repo-key`: show how a repository URL maps to its key.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::errors::ClientError;
use crate::domain::models::RepoKey;

#[derive(Args, Debug)]
pub struct RepoKeyArgs {
    /// Repository URL
    pub repo_url: String,
}

#[derive(Debug, Serialize)]
pub struct RepoKeyOutput {
    pub repo_url: String,
    pub repo_key: RepoKey,
    pub bundle_filename: String,
}

impl CommandOutput for RepoKeyOutput {
    fn to_human(&self) -> String {
        format!(
            "Repository key: {}\nBundle filename: {}",
            self.repo_key, self.bundle_filename
        )
    }
}

pub fn execute(args: RepoKeyArgs, json_mode: bool) -> Result<()> {
    let repo_key = RepoKey::derive(&args.repo_url);
    if repo_key.is_empty() {
        return Err(ClientError::InvalidRequest(format!(
            "no repository key can be derived from '{}'",
            args.repo_url
        ))
        .into());
    }

    let result = RepoKeyOutput {
        bundle_filename: repo_key.bundle_filename(),
        repo_url: args.repo_url,
        repo_key,
    };
    output(&result, json_mode);
    Ok(())
}
