//! CSV output formatter for run results.
//!
//! One row is generated for each removal candidate.
//!
//! # Columns
//!
//! - `path`: The duplicate file
//! - `keeper`: The copy that was kept
//! - `size`: File size in bytes
//! - `action`: `move` or `delete`
//! - `outcome`: `moved`, `deleted`, `skipped` or `failed`
//! - `detail`: Quarantine destination or skip/failure reason
//!
//! # Example
//!
//! ```no_run
//! use dupremover::output::csv::CsvOutput;
//! use dupremover::runner::{RunConfig, Runner};
//!
//! let result = Runner::new(RunConfig::new(".").with_dry_run(true)).run().unwrap();
//! CsvOutput::new(&result.candidates).write_to(std::io::stdout()).unwrap();
//! ```

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::runner::CandidateReport;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single row in the CSV output.
#[derive(Debug, Serialize)]
struct CsvRow {
    path: String,
    keeper: String,
    size: u64,
    action: String,
    outcome: &'static str,
    detail: String,
}

impl From<&CandidateReport> for CsvRow {
    fn from(c: &CandidateReport) -> Self {
        Self {
            path: c.path.to_string_lossy().into_owned(),
            keeper: c.keeper.to_string_lossy().into_owned(),
            size: c.size,
            action: c.action.to_string(),
            outcome: c.outcome.label(),
            detail: c.outcome.detail(),
        }
    }
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    candidates: &'a [CandidateReport],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(candidates: &'a [CandidateReport]) -> Self {
        Self { candidates }
    }

    /// Write the CSV output to the given writer.
    ///
    /// The header row is written even when there are no candidates.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        if self.candidates.is_empty() {
            csv_writer.write_record(["path", "keeper", "size", "action", "outcome", "detail"])?;
        }
        for candidate in self.candidates {
            csv_writer.serialize(CsvRow::from(candidate))?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
