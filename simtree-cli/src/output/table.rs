//! Table output formatting using the `tabled` crate

use super::{truncate, OutputConfig};
use tabled::{
    builder::Builder,
    settings::{object::Columns, style::Style, Alignment, Modify, Width},
};

/// Table output formatter
pub struct TableOutput;

impl TableOutput {
    /// Table with a header row. Cells are cut to `max_cell` characters when
    /// truncation is on.
    pub fn from_rows(
        headers: &[&str],
        rows: &[Vec<String>],
        max_cell: Option<usize>,
        config: &OutputConfig,
    ) -> String {
        if rows.is_empty() {
            return "(no results)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(headers.iter().copied());

        for row in rows {
            builder.push_record(row.iter().map(|cell| match max_cell {
                Some(max) if config.should_truncate() => truncate(cell, max),
                _ => cell.clone(),
            }));
        }

        let mut table = builder.build();
        Self::apply_style(&mut table, config);
        table.to_string()
    }

    /// Two-column key/value table, keys right-aligned.
    pub fn format_key_value(pairs: &[(&str, String)], config: &OutputConfig) -> String {
        let mut builder = Builder::default();

        for (key, value) in pairs {
            builder.push_record([*key, value.as_str()]);
        }

        let mut table = builder.build();
        table.with(Modify::new(Columns::first()).with(Alignment::right()));
        Self::apply_style(&mut table, config);
        table.to_string()
    }

    fn apply_style(table: &mut tabled::Table, config: &OutputConfig) {
        if config.compact {
            table.with(Style::blank());
        } else {
            table.with(Style::rounded());
        }

        if config.should_truncate() {
            table.with(Width::wrap(config.effective_width()));
        }
    }
}
