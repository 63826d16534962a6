//! Command-line interface definitions for dupremover.
//!
//! The CLI is a thin layer over [`crate::runner::RunConfig`]: its value
//! enums map one-to-one onto the core [`Mode`] and [`Action`] enums.
//!
//! # Example
//!
//! ```bash
//! # Move duplicates inside ~/Photos to ~/Photos/_duplicates
//! dupremover ~/Photos
//!
//! # Remove from the backup every file that already exists in ~/Photos
//! dupremover ~/Photos /mnt/backup --action delete --yes
//!
//! # Preview only, JSON report
//! dupremover ~/Photos /mnt/backup --mode b-vs-a --dry-run --output json
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::actions::Action;
use crate::duplicates::Mode;
use crate::runner::RunConfig;

/// Find and remove duplicate files within one directory or across two.
///
/// Files are compared by size and SHA-256 content digest. Duplicates are
/// moved to a `_duplicates` folder of the directory they are removed from,
/// or deleted permanently with `--action delete`.
#[derive(Debug, Parser)]
#[command(name = "dupremover")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Directory A
    #[arg(value_name = "DIR_A")]
    pub dir_a: PathBuf,

    /// Directory B, compared against A
    #[arg(value_name = "DIR_B")]
    pub dir_b: Option<PathBuf>,

    /// Comparison mode (default: within without DIR_B, a-vs-b with it)
    #[arg(long, value_enum, env = "DUPREMOVER_MODE")]
    pub mode: Option<ModeArg>,

    /// What to do with duplicates
    #[arg(long, value_enum, default_value = "move", env = "DUPREMOVER_ACTION")]
    pub action: ActionArg,

    /// Only scan the top level of each directory
    #[arg(long)]
    pub no_recursive: bool,

    /// Report what would happen without touching any file
    #[arg(long)]
    pub dry_run: bool,

    /// Ignore zero-byte files
    #[arg(long)]
    pub skip_empty: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Confirm permanent deletion without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Output format for the run report
    #[arg(
        short,
        long,
        value_enum,
        default_value = "text",
        env = "DUPREMOVER_OUTPUT"
    )]
    pub output: OutputFormat,

    /// Print errors as JSON objects on stderr
    #[arg(long)]
    pub json_errors: bool,
}

impl Cli {
    /// Mode requested on the command line, or the default for the given roots.
    #[must_use]
    pub fn effective_mode(&self) -> Mode {
        match self.mode {
            Some(mode) => mode.into(),
            None if self.dir_b.is_some() => Mode::AvsB,
            None => Mode::WithinA,
        }
    }

    /// Run configuration for these arguments.
    ///
    /// Deletion is confirmed only by `--yes`; the interactive prompt in
    /// [`crate::run_app`] upgrades it after the user answers.
    #[must_use]
    pub fn to_run_config(&self) -> RunConfig {
        let mut config = RunConfig::new(&self.dir_a)
            .with_mode(self.effective_mode())
            .with_action(self.action.into())
            .with_recursive(!self.no_recursive)
            .with_dry_run(self.dry_run)
            .with_skip_empty(self.skip_empty)
            .with_skip_hidden(self.skip_hidden)
            .with_delete_confirmed(self.yes);
        if let Some(ref dir_b) = self.dir_b {
            config = config.with_root_b(dir_b);
        }
        config
    }
}

/// Comparison mode on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Duplicates within DIR_A
    Within,
    /// Remove from DIR_B the files that also exist in DIR_A
    #[value(name = "a-vs-b", alias = "a_vs_b")]
    AVsB,
    /// Remove from DIR_A the files that also exist in DIR_B
    #[value(name = "b-vs-a", alias = "b_vs_a")]
    BVsA,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Within => Mode::WithinA,
            ModeArg::AVsB => Mode::AvsB,
            ModeArg::BVsA => Mode::BvsA,
        }
    }
}

/// Action on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    /// Move duplicates to the `_duplicates` folder
    Move,
    /// Delete duplicates permanently
    Delete,
}

impl From<ActionArg> for Action {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Move => Action::Move,
            ActionArg::Delete => Action::Delete,
        }
    }
}

/// Output format for the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored summary for the terminal
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
