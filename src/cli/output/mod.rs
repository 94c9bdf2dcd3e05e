//! CLI output formatting
//!
//! Every command result implements [`CommandOutput`] and is printed either
//! as human-readable text or as a JSON document (`--json`).

pub mod progress;
pub mod table;

use console::{style, Term};
use serde::Serialize;

use crate::services::{Presentation, Section};

pub use progress::{create_spinner, ProgressBarExt};
pub use table::TableFormatter;

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate a string to at most `max_len` characters, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Rendering of a [`Presentation`]: styled on a terminal, plain text when
/// stdout is piped.
pub fn render_presentation(view: &Presentation) -> String {
    render_presentation_for(view, Term::stdout().is_term())
}

fn render_presentation_for(view: &Presentation, styled: bool) -> String {
    if !styled {
        return view.render_text();
    }

    let badge = if view.is_success() {
        style(format!("✓ {}", view.label)).green().bold()
    } else {
        style(format!("✗ {}", view.label)).red().bold()
    };

    let mut lines = vec![format!("{}  {badge}", style(&view.headline).bold())];
    for Section {
        title,
        body,
        verbatim,
    } in &view.sections
    {
        lines.push(String::new());
        lines.push(style(title).bold().underlined().to_string());
        if *verbatim {
            lines.push(body.trim_end().to_string());
        } else {
            lines.push(style(body.trim_end()).dim().to_string());
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TestRunReport;
    use crate::services::ResultPresenter;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short.py", 20), "short.py");
        assert_eq!(truncate("test_a_very_long_name.py", 10), "test_a_...");
        assert_eq!(truncate("ééééé", 4), "é...");
    }

    #[test]
    fn test_piped_presentation_is_plain_text() {
        let view = ResultPresenter::test_run(&TestRunReport::failed("boom"));

        let rendered = render_presentation_for(&view, false);

        assert_eq!(rendered, view.render_text());
        assert!(!rendered.contains('✗'));
    }

    #[test]
    fn test_terminal_presentation_has_badge() {
        let view = ResultPresenter::test_run(&TestRunReport::failed("boom"));

        let rendered = render_presentation_for(&view, true);

        assert!(rendered.contains("✗ Failed"));
        assert!(rendered.contains("Stderr"));
    }
}
