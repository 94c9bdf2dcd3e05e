//! `trinity run`: trigger a backend test run.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::Instrument;

use crate::cli::output::{create_spinner, output, render_presentation, CommandOutput, ProgressBarExt};
use crate::cli::{unlocked_session, GlobalArgs};
use crate::domain::errors::{ClientError, GENERIC_FAILURE_MESSAGE};
use crate::domain::models::{Config, Language, TestRunReport, TestType};
use crate::services::{Presentation, ResultPresenter};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Language of the test suite
    #[arg(short, long, default_value_t = Language::Python)]
    pub language: Language,

    /// Kind of tests to run (auto, unit, ui)
    #[arg(short, long, default_value_t = TestType::Auto)]
    pub test_type: TestType,
}

#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub report: TestRunReport,
    pub result: Presentation,
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        render_presentation(&self.result)
    }
}

pub async fn execute(args: RunArgs, global: &GlobalArgs, config: &Config) -> Result<()> {
    let session = unlocked_session(global, config).await?;

    let spinner = create_spinner(
        format!("Running {} {} tests...", args.language, args.test_type),
        global.json,
    );
    let report = session
        .test_runner()
        .run(args.language, args.test_type)
        .instrument(session.span())
        .await;
    session.end().await;

    let report = match report {
        Ok(report) => report,
        Err(err) => {
            spinner.finish_error("Test run was not started");
            return Err(err.into());
        }
    };
    if report.is_success() {
        spinner.finish_success("Tests passed");
    } else {
        spinner.finish_error("Tests failed");
    }

    let result = RunOutput {
        result: ResultPresenter::test_run(&report),
        report,
    };
    output(&result, global.json);

    if result.report.is_success() {
        Ok(())
    } else {
        let detail = result
            .report
            .error
            .clone()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
        Err(ClientError::TestRunFailed(detail).into())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Commands};

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["trinity", "run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.language, Language::Python);
        assert_eq!(args.test_type, TestType::Auto);
    }

    #[test]
    fn test_output_embeds_report_and_presentation() {
        let report = TestRunReport::failed("boom");
        let result = RunOutput {
            result: ResultPresenter::test_run(&report),
            report,
        };

        let json = result.to_json();
        assert_eq!(json["report"]["status"], "error");
        assert_eq!(json["result"]["label"], "Failed");
        assert!(result.to_human().contains("No stdout output."));
    }
}
