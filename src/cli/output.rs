//! Output formatting for CLI commands.
//!
//! Supports two modes: human-readable tables (default) and JSON (--json).

use serde::Serialize;
use tabled::{Table, Tabled};

use crate::coordinator::Notice;
use crate::domain::{AttendantDraft, AttendantRecord, DraftField, Roster};

/// Output mode for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Table
        }
    }
}

/// One roster line in the results table
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct RosterRow {
    #[tabled(rename = "#")]
    pub position: usize,
    #[tabled(rename = "Identifier")]
    pub identifier: String,
    #[tabled(rename = "First Name")]
    pub first_name: String,
    #[tabled(rename = "Last Name")]
    pub last_name: String,
    #[tabled(rename = "Age")]
    pub age: String,
    #[tabled(rename = "Gender")]
    pub gender: String,
    #[tabled(rename = "Organization Unit")]
    pub organization_unit: String,
    #[tabled(rename = "Training Date")]
    pub training_date: String,
}

impl RosterRow {
    pub fn from_record(position: usize, record: &AttendantRecord) -> Self {
        Self {
            position,
            identifier: record.identifier.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            age: record.age.clone(),
            gender: record.gender.to_string(),
            organization_unit: record.organization_unit.clone(),
            training_date: record.training_date.to_string(),
        }
    }
}

pub fn roster_rows(roster: &Roster) -> Vec<RosterRow> {
    roster
        .iter()
        .enumerate()
        .map(|(i, r)| RosterRow::from_record(i + 1, r))
        .collect()
}

/// Roster as a table, or the plain record list as JSON
pub fn render_roster(roster: &Roster, mode: OutputMode, detail: bool) -> anyhow::Result<String> {
    match mode {
        OutputMode::Json => Ok(serde_json::to_string_pretty(roster)?),
        OutputMode::Table if roster.is_empty() => Ok("(no attendants registered yet)".to_string()),
        OutputMode::Table => {
            let mut out = Table::new(roster_rows(roster)).to_string();
            if detail {
                for (i, record) in roster.iter().enumerate() {
                    out.push_str(&format!("\n  {}. {}", i + 1, record.detail()));
                }
            }
            Ok(out)
        }
    }
}

/// The draft as "label: value" lines, in form order
pub fn render_draft(draft: &AttendantDraft) -> String {
    DraftField::ALL
        .iter()
        .map(|field| {
            let value = draft.get(*field);
            let shown = if value.is_empty() { "-" } else { value };
            format!("{:>18}: {}", field.label(), shown)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_notice(notice: &Notice) -> String {
    format!("\x1b[31m✗ {}\x1b[0m\n  {}", notice.title, notice.message)
}

/// Print a single Serialize item, pretty JSON in both modes.
pub fn print_item<T: Serialize>(item: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(item)?);
    Ok(())
}

/// Print a simple list, one per line or as a JSON array.
pub fn print_lines(items: &[String], mode: OutputMode) -> anyhow::Result<()> {
    match mode {
        OutputMode::Table if items.is_empty() => println!("(no results)"),
        OutputMode::Table => {
            for item in items {
                println!("{item}");
            }
        }
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(items)?),
    }
    Ok(())
}
