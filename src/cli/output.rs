//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! changesets to the user in various formats.

use colored::Colorize;
use std::io::Write;
use tabled::{Table, Tabled};

use crate::changeset::{ChangeAction, NormalizedChange};
use crate::cloudformation::ChangesetDescription;
use crate::error::{GiffError, Result};

use super::commands::OutputFormat;

/// Advisory line written when a changeset carries no resource changes.
pub const NO_CHANGES: &str = "No changes";

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Change row for table display.
#[derive(Tabled)]
struct ChangeRow {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Logical ID")]
    logical_id: String,
    #[tabled(rename = "Physical ID")]
    physical_id: String,
    #[tabled(rename = "Type")]
    resource_type: String,
    #[tabled(rename = "Replacement")]
    replacement: String,
    #[tabled(rename = "Scope")]
    scope: String,
}

impl From<&NormalizedChange> for ChangeRow {
    fn from(change: &NormalizedChange) -> Self {
        Self {
            action: change.action.to_string(),
            logical_id: change.logical_id.clone(),
            physical_id: change.physical_id.clone().unwrap_or_default(),
            resource_type: change.resource_type.clone(),
            replacement: change.replacement.to_string(),
            scope: change.scope.join(", "),
        }
    }
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Renders one change as a single summary line.
    #[must_use]
    pub fn change_line(change: &NormalizedChange) -> String {
        let logical = &change.logical_id;
        let physical = change.physical_id.as_deref().unwrap_or_default();
        let resource_type = &change.resource_type;

        match change.action {
            ChangeAction::Add => format!("+     add: {logical} - {resource_type}"),
            ChangeAction::Remove => format!("-  remove: {logical} - {resource_type}"),
            ChangeAction::Modify => format!(
                "*  modify: {logical} ({physical}) - {resource_type} / replacement: {}",
                change.replacement
            ),
            ChangeAction::Dynamic => format!(
                "* dynamic: {logical} ({physical}) - {resource_type} / replacement: {}",
                change.replacement
            ),
            ChangeAction::Import => format!("+  import: {logical} ({physical}) - {resource_type}"),
            ChangeAction::Unknown(_) => format!("{change:?} [unknown change type]"),
        }
    }

    /// Formats a change list; `None` when there is nothing to print.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn format_changes(&self, changes: &[NormalizedChange]) -> Result<Option<String>> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(changes)
                .map(Some)
                .map_err(|e| GiffError::internal(format!("Failed to serialize changes: {e}"))),
            _ if changes.is_empty() => Ok(None),
            OutputFormat::Text => Ok(Some(
                changes
                    .iter()
                    .map(Self::change_line)
                    .collect::<Vec<_>>()
                    .join("\n"),
            )),
            OutputFormat::Table => {
                let rows: Vec<ChangeRow> = changes.iter().map(ChangeRow::from).collect();
                Ok(Some(Table::new(rows).to_string()))
            }
        }
    }

    /// Writes a change list to `out`, or the advisory line to `err` when
    /// the list is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_changes(
        &self,
        changes: &[NormalizedChange],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<()> {
        if changes.is_empty() {
            writeln!(err, "{NO_CHANGES}")?;
        }
        if let Some(rendered) = self.format_changes(changes)? {
            writeln!(out, "{rendered}")?;
        }
        Ok(())
    }

    /// Formats a full changeset description as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn format_description(description: &ChangesetDescription) -> Result<String> {
        serde_json::to_string_pretty(description)
            .map_err(|e| GiffError::internal(format!("Failed to serialize changeset: {e}")))
    }

    /// Formats the marker closing a progress step.
    #[must_use]
    pub fn ok_marker() -> String {
        "ok".green().to_string()
    }

    /// Formats a warning line.
    #[must_use]
    pub fn warning(message: &str) -> String {
        format!("{} {message}", "Warning:".yellow())
    }
}
