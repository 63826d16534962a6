//! Output formatters for run results.
//!
//! - Text for people at a terminal
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use dupremover::error::ExitCode;
//! use dupremover::output::JsonOutput;
//! use dupremover::runner::{RunConfig, Runner};
//!
//! let result = Runner::new(RunConfig::new(".").with_dry_run(true)).run().unwrap();
//! let output = JsonOutput::new(&result, ExitCode::for_result(&result));
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

// Re-export main types
pub use csv::{CsvOutput, CsvOutputError};
pub use json::{JsonOutput, JsonOutputError, RunReport};
pub use text::TextOutput;
