//! Terminal front end for the registration workflow.
//!
//! Commands:
//! - `register` - submit one attendant from flags
//! - `shell` - interactive form
//! - `roster` - show the locally cached roster
//! - `ids` - draw identifiers from the active strategy
//! - `remote` - inspect the data store namespace

pub mod output;
pub mod shell;

use clap::{Args, Parser, Subcommand};

use crate::domain::DraftField;
use crate::identifier::StrategyKind;

/// DHIS2 training attendant registration
#[derive(Parser, Debug)]
#[command(name = "attendant-registry")]
#[command(author, version, about = "Register training attendants in a DHIS2 data store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding default.toml and per-environment config files
    #[arg(short, long, default_value = "config", env = "ATTENDANT_CONFIG_DIR")]
    pub config_dir: String,

    /// Override the configured identifier strategy
    #[arg(long, value_parser = parse_strategy)]
    pub strategy: Option<StrategyKind>,

    /// Keep the roster in memory only for this run
    #[arg(long)]
    pub no_cache: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit one attendant
    Register(RegisterArgs),

    /// Fill in and submit attendants interactively
    Shell,

    /// Show attendants registered from this machine
    Roster {
        /// Add the one-line summary under each row
        #[arg(long)]
        detail: bool,
    },

    /// Print identifiers from the active strategy
    Ids {
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Inspect the data store namespace
    #[command(subcommand)]
    Remote(RemoteCommands),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RegisterArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub age: Option<String>,
    /// Male, Female or Other
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long = "org-unit")]
    pub organization_unit: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub training_date: Option<String>,
}

impl RegisterArgs {
    /// Field edits in form order, skipping flags that were not given
    pub fn field_values(&self) -> Vec<(DraftField, String)> {
        [
            (DraftField::FirstName, &self.first_name),
            (DraftField::LastName, &self.last_name),
            (DraftField::Age, &self.age),
            (DraftField::Gender, &self.gender),
            (DraftField::OrganizationUnit, &self.organization_unit),
            (DraftField::TrainingDate, &self.training_date),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.clone().map(|v| (field, v)))
        .collect()
    }
}

#[derive(Subcommand, Debug)]
pub enum RemoteCommands {
    /// List keys in the namespace
    List,
    /// Print one stored entry
    Get { key: String },
}

fn parse_strategy(raw: &str) -> Result<StrategyKind, String> {
    raw.parse::<StrategyKind>().map_err(|e| e.to_string())
}
