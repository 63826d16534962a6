//! dupremover - duplicate file finder and remover
//!
//! Finds files with identical content (same size and SHA-256 digest) inside
//! one directory or across two, and moves the surplus copies to a
//! `_duplicates` folder or deletes them.
//!
//! The library is usable without the CLI: build a [`runner::RunConfig`],
//! hand it to a [`runner::Runner`] and inspect the [`runner::RunResult`].

pub mod actions;
pub mod cli;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod runner;
pub mod scanner;
pub mod signal;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;

use crate::actions::Action;
use crate::cli::{Cli, OutputFormat};
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, TextOutput};
use crate::progress::Progress;
use crate::runner::{RunError, Runner};

/// Run the application for parsed CLI arguments.
///
/// # Errors
///
/// Returns an error if the run cannot start (bad roots, declined deletion,
/// interruption before any file was touched) or the report cannot be written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let handler = signal::install_handler().context("Failed to set up Ctrl+C handling")?;

    let mut config = cli.to_run_config();
    if config.action == Action::Delete && !config.dry_run && !config.confirm_delete {
        let stdin = io::stdin();
        let confirmed = confirm_delete(&mut stdin.lock(), &mut io::stderr())
            .context("Failed to read confirmation")?;
        if !confirmed {
            return Err(RunError::DeleteNotConfirmed.into());
        }
        config = config.with_delete_confirmed(true);
    }

    log::debug!("Run configuration: {config:?}");

    let progress = Progress::new(cli.quiet).with_messages(cli.output == OutputFormat::Text);
    let result = Runner::new(config)
        .with_progress_callback(Arc::new(progress))
        .with_shutdown_flag(handler.get_flag())
        .run()?;

    let exit_code = ExitCode::for_result(&result);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.output {
        OutputFormat::Text => {
            if !cli.quiet {
                TextOutput::new(&result).write_to(&mut out)?;
            }
        }
        OutputFormat::Json => JsonOutput::new(&result, exit_code).write_to(&mut out, true)?,
        OutputFormat::Csv => CsvOutput::new(&result.candidates).write_to(&mut out)?,
    }
    out.flush()?;

    Ok(exit_code)
}

/// Ask for permission to delete permanently.
///
/// Only `y` or `yes` (any case) count as consent; anything else, including
/// end of input, declines.
///
/// # Errors
///
/// Returns an error if the prompt cannot be written or the answer read.
pub fn confirm_delete<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<bool> {
    write!(
        writer,
        "Duplicates will be permanently deleted and cannot be recovered. Continue? (y/N): "
    )?;
    writer.flush()?;

    let mut answer = String::new();
    reader.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
