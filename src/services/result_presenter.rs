//! Result presentation.
//!
//! Turns a [`GenerationResult`] or [`TestRunReport`] into a display-ready
//! [`Presentation`]: a headline, a success/failed badge and titled sections.
//! Styling is left to the caller; this module only decides what is shown.

use serde::Serialize;

use crate::domain::errors::GENERIC_FAILURE_MESSAGE;
use crate::domain::models::{GenerationResult, RepoKey, ResultStatus, TestRunReport};

const NO_STDOUT: &str = "No stdout output.";
const NO_STDERR: &str = "No stderr output.";
const NO_CODE: &str = "No test code was returned.";

/// One titled block of output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub body: String,
    /// Body is source code or raw runner output and should be shown verbatim.
    pub verbatim: bool,
}

impl Section {
    fn text(title: &str, body: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            body: body.into(),
            verbatim: false,
        }
    }

    fn verbatim(title: &str, body: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            body: body.into(),
            verbatim: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub headline: String,
    pub status: ResultStatus,
    pub label: &'static str,
    pub sections: Vec<Section>,
}

impl Presentation {
    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }

    /// Plain-text rendering, sections separated by blank lines.
    pub fn render_text(&self) -> String {
        let mut out = format!("{} [{}]\n", self.headline, self.label);
        for section in &self.sections {
            out.push('\n');
            out.push_str(&section.title);
            out.push_str(":\n");
            out.push_str(section.body.trim_end());
            out.push('\n');
        }
        out
    }
}

fn label(status: ResultStatus) -> &'static str {
    match status {
        ResultStatus::Success => "Success",
        ResultStatus::Error => "Failed",
    }
}

pub struct ResultPresenter;

impl ResultPresenter {
    /// Present a generation outcome for `repo_key`.
    ///
    /// `persisted` adds a note that the bundle can be downloaded.
    pub fn generation(result: &GenerationResult, repo_key: &RepoKey, persisted: bool) -> Presentation {
        let mut sections = Vec::new();
        let headline = if result.is_success() {
            let code = result
                .generated_code
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(NO_CODE);
            sections.push(Section::verbatim("Generated test code", code));
            if persisted {
                sections.push(Section::text(
                    "Download",
                    format!("Bundle available as {}", repo_key.bundle_filename()),
                ));
            }
            format!("Tests generated for {}", display_key(repo_key))
        } else {
            let detail = result
                .error_detail
                .as_deref()
                .unwrap_or(GENERIC_FAILURE_MESSAGE);
            sections.push(Section::text("Error", detail));
            format!("Test generation failed for {}", display_key(repo_key))
        };

        Presentation {
            headline,
            status: result.status,
            label: label(result.status),
            sections,
        }
    }

    /// Present a backend test run with its stdout and stderr panes.
    pub fn test_run(report: &TestRunReport) -> Presentation {
        let stdout = if report.output.trim().is_empty() {
            NO_STDOUT
        } else {
            report.output.as_str()
        };
        let stderr = report
            .error
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(NO_STDERR);

        Presentation {
            headline: "Test Results".to_string(),
            status: report.status,
            label: label(report.status),
            sections: vec![
                Section::verbatim("Stdout", stdout),
                Section::verbatim("Stderr", stderr),
            ],
        }
    }
}

fn display_key(repo_key: &RepoKey) -> &str {
    if repo_key.is_empty() {
        "(unknown repository)"
    } else {
        repo_key.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_success_with_download_note() {
        let key = RepoKey::derive("https://x/y/Foo-Bar.git");
        let view = ResultPresenter::generation(&GenerationResult::success("def test_a(): pass"), &key, true);

        assert!(view.is_success());
        assert_eq!(view.label, "Success");
        assert_eq!(view.headline, "Tests generated for Foo_Bar");
        assert_eq!(view.sections[0].body, "def test_a(): pass");
        assert!(view.sections[0].verbatim);
        assert_eq!(view.sections[1].body, "Bundle available as Foo_Bar_tests.zip");
    }

    #[test]
    fn test_dry_run_success_has_no_download_note() {
        let key = RepoKey::derive("repo");
        let view = ResultPresenter::generation(&GenerationResult::success(""), &key, false);

        assert_eq!(view.sections.len(), 1);
        assert_eq!(view.sections[0].body, NO_CODE);
    }

    #[test]
    fn test_generation_failure_shows_detail() {
        let key = RepoKey::derive("repo");
        let view = ResultPresenter::generation(&GenerationResult::failure("clone failed"), &key, false);

        assert!(!view.is_success());
        assert_eq!(view.label, "Failed");
        assert_eq!(view.sections, vec![Section::text("Error", "clone failed")]);
    }

    #[test]
    fn test_run_empty_panes_use_fallbacks() {
        let report = TestRunReport {
            status: ResultStatus::Success,
            output: String::new(),
            error: None,
        };

        let view = ResultPresenter::test_run(&report);

        assert_eq!(view.sections[0].body, NO_STDOUT);
        assert_eq!(view.sections[1].body, NO_STDERR);
    }

    #[test]
    fn test_render_text() {
        let view = ResultPresenter::test_run(&TestRunReport::failed("boom"));

        assert_eq!(
            view.render_text(),
            "Test Results [Failed]\n\nStdout:\nNo stdout output.\n\nStderr:\nboom\n"
        );
    }
}
