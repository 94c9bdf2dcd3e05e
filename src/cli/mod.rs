//! Command-line interface for the Trinity client.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use tracing::Instrument;

use crate::domain::errors::ClientError;
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::AssuranceSession;

use self::output::{create_spinner, ProgressBarExt};

#[derive(Parser, Debug)]
#[command(name = "trinity")]
#[command(about = "Trinity - license-gated AI test generation client", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .trinity/config.yaml and .trinity/local.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overrides the configuration
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// License token
    #[arg(long, global = true, env = "TRINITY_LICENSE_TOKEN", hide_env_values = true)]
    pub license: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the repository key derived from a repository URL
    RepoKey(commands::repo_key::RepoKeyArgs),
    /// Verify the license token with the backend
    Verify(commands::verify::VerifyArgs),
    /// Generate tests for a repository
    Generate(commands::generate::GenerateArgs),
    /// Browse previously generated test files
    History(commands::history::HistoryArgs),
    /// Run the backend's test suite
    Run(commands::run::RunArgs),
}

impl GlobalArgs {
    /// Load configuration and apply command-line overrides.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        if let Some(base_url) = &self.base_url {
            config.backend.base_url = base_url.clone();
            ConfigLoader::validate(&config)?;
        }
        Ok(config)
    }

    pub fn license_token(&self) -> Result<&str> {
        self.license
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .context("No license token: pass --license or set TRINITY_LICENSE_TOKEN")
    }
}

/// Build a session for `config` and unlock it with the global license token.
pub async fn unlocked_session(global: &GlobalArgs, config: &Config) -> Result<AssuranceSession> {
    let token = global.license_token()?;
    let session = AssuranceSession::from_config(&config.backend)?;

    let spinner = create_spinner("Verifying license...", global.json);
    match session
        .license()
        .verify(token)
        .instrument(session.span())
        .await
    {
        Ok(()) => {
            spinner.finish_success("License verified");
            Ok(session)
        }
        Err(err) => {
            spinner.finish_error("License verification failed");
            Err(err.into())
        }
    }
}

/// Print `err` in the requested format and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let code = exit_code(&err);
    if json_mode {
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": err.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err}", style("Error:").red().bold());
        for cause in err.chain().skip(1) {
            eprintln!("  {} {cause}", style("caused by:").dim());
        }
    }
    std::process::exit(code)
}

/// 2 for license problems, 3 for connectivity, 1 otherwise.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ClientError>() {
        Some(ClientError::Locked | ClientError::LicenseInvalid(_)) => 2,
        Some(ClientError::Network(_)) => 3,
        _ => 1,
    }
}
