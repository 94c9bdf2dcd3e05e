//! `trinity generate`: submit a generation request and present the result.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::Instrument;

use crate::cli::output::{create_spinner, output, render_presentation, CommandOutput, ProgressBarExt};
use crate::cli::{unlocked_session, GlobalArgs};
use crate::domain::errors::{ClientError, GENERIC_FAILURE_MESSAGE};
use crate::domain::models::{Config, GenerationParams, Language, RepoKey, TestType};
use crate::services::{Presentation, ResultPresenter};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Repository URL to generate tests for
    pub repo_url: String,

    /// Language of the repository
    #[arg(short, long, default_value_t = Language::Python)]
    pub language: Language,

    /// Generate tests for a single file only
    #[arg(short, long)]
    pub file_path: Option<String>,

    /// Restrict generation to a folder
    #[arg(long)]
    pub folder_filter: Option<String>,

    /// Kind of tests (auto, unit, ui)
    #[arg(short, long, default_value_t = TestType::Auto)]
    pub test_type: TestType,

    /// Generate without persisting anything on the backend
    #[arg(long)]
    pub dry_run: bool,

    /// Download the persisted test bundle afterwards
    #[arg(long, conflicts_with = "dry_run")]
    pub download: bool,

    /// Write the generated code to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    fn params(&self) -> GenerationParams {
        let mut params = GenerationParams::new(self.repo_url.clone())
            .with_language(self.language)
            .with_test_type(self.test_type)
            .dry_run(self.dry_run);
        if let Some(file_path) = &self.file_path {
            params = params.with_file_path(file_path.clone());
        }
        if let Some(folder_filter) = &self.folder_filter {
            params = params.with_folder_filter(folder_filter.clone());
        }
        params
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    pub repo_key: RepoKey,
    pub dry_run: bool,
    pub result: Presentation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_file: Option<PathBuf>,
}

impl CommandOutput for GenerateOutput {
    fn to_human(&self) -> String {
        let mut text = render_presentation(&self.result);
        if let Some(path) = &self.code_file {
            text.push_str(&format!("\n\nGenerated code written to {}", path.display()));
        }
        if let Some(path) = &self.bundle_file {
            text.push_str(&format!("\nTest bundle saved to {}", path.display()));
        }
        text
    }
}

pub async fn execute(args: GenerateArgs, global: &GlobalArgs, config: &Config) -> Result<()> {
    let params = args.params();
    params.validate()?;

    let session = unlocked_session(global, config).await?;
    let repo_key = params.repo_key();

    let spinner = create_spinner(format!("Generating tests for {repo_key}..."), global.json);
    let submitted = session
        .generations()
        .submit(&params)
        .instrument(session.span())
        .await;
    let result = match submitted {
        Ok(result) => result,
        Err(err) => {
            spinner.finish_error("Generation was not submitted");
            return Err(err.into());
        }
    };
    if result.is_success() {
        spinner.finish_success("Tests generated");
    } else {
        spinner.finish_error("Test generation failed");
    }

    let persisted = session.generations().has_persisted_artifact(&repo_key).await;
    let mut report = GenerateOutput {
        result: ResultPresenter::generation(&result, &repo_key, persisted),
        repo_key: repo_key.clone(),
        dry_run: args.dry_run,
        code_file: None,
        bundle_file: None,
    };

    if let (Some(path), Some(code)) = (&args.output, &result.generated_code) {
        write_code(path, code).await?;
        report.code_file = Some(path.clone());
    }

    if args.download && result.is_success() {
        let spinner = create_spinner("Downloading test bundle...", global.json);
        let bundle = session
            .artifacts()
            .download(&repo_key)
            .instrument(session.span())
            .await;
        match bundle {
            Ok(Some(bundle)) => {
                let path = bundle
                    .write_to_dir(&config.output.download_dir)
                    .await
                    .with_context(|| {
                        format!(
                            "Failed to save {} to {}",
                            bundle.filename,
                            config.output.download_dir.display()
                        )
                    })?;
                spinner.finish_success(format!("Saved {}", bundle.filename));
                report.bundle_file = Some(path);
            }
            Ok(None) => spinner.finish_and_clear(),
            Err(err) => {
                spinner.finish_error("Download failed");
                output(&report, global.json);
                session.end().await;
                return Err(err.into());
            }
        }
    }

    session.end().await;
    output(&report, global.json);

    if result.is_success() {
        Ok(())
    } else {
        let detail = result
            .error_detail
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
        Err(ClientError::GenerationFailed(detail).into())
    }
}

async fn write_code(path: &Path, code: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, code)
        .await
        .with_context(|| format!("Failed to write generated code to {}", path.display()))
}
