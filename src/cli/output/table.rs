//! Table output formatting for CLI commands using comfy-table.

use std::env;
use std::path::Path;

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};

use super::truncate;
use crate::domain::models::HistoryEntry;

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use UTF-8 borders and attributes
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format history entries in backend order
    pub fn format_history(&self, entries: &[HistoryEntry]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            self.header("#"),
            self.header("File"),
            self.header("Type"),
        ]);

        for (index, entry) in entries.iter().enumerate() {
            let kind = Path::new(&entry.filename)
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or("-");
            table.add_row(vec![
                Cell::new(index + 1),
                Cell::new(truncate(&entry.filename, 60)),
                Cell::new(kind),
            ]);
        }

        table.to_string()
    }

    fn header(&self, title: &str) -> Cell {
        let cell = Cell::new(title);
        if self.use_colors {
            cell.add_attribute(Attribute::Bold)
        } else {
            cell
        }
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        if self.use_colors {
            table.load_preset(presets::UTF8_FULL);
        } else {
            table.load_preset(presets::ASCII_FULL);
        }
        table.set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    env::var("TERM").map_or(true, |term| term != "dumb")
}
