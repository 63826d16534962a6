//! Structured error handling and exit codes.

use serde::Serialize;

use crate::runner::{RunError, RunResult};
use crate::signal::EXIT_CODE_INTERRUPTED;

/// Exit codes for the dupremover binary.
///
/// - 0: Success (duplicates found and handled)
/// - 1: General error (invalid input or unexpected failure)
/// - 2: No duplicates found
/// - 3: Partial success (some scan or action errors)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: duplicates were found and handled.
    Success = 0,
    /// General error: the run could not complete.
    GeneralError = 1,
    /// No duplicates: the scan completed and found nothing to remove.
    NoDuplicates = 2,
    /// Partial success: the run completed with some per-file errors.
    PartialSuccess = 3,
    /// Interrupted: the run was interrupted by user (Ctrl+C).
    Interrupted = EXIT_CODE_INTERRUPTED as isize,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DR000",
            Self::GeneralError => "DR001",
            Self::NoDuplicates => "DR002",
            Self::PartialSuccess => "DR003",
            Self::Interrupted => "DR130",
        }
    }

    /// Exit code describing a finished run.
    #[must_use]
    pub fn for_result(result: &RunResult) -> Self {
        if result.interrupted {
            Self::Interrupted
        } else if result.has_errors() {
            Self::PartialSuccess
        } else if result.is_empty() {
            Self::NoDuplicates
        } else {
            Self::Success
        }
    }

    /// Exit code for an error that ended the application.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<RunError>() {
            Some(e) if !e.is_invalid_input() => Self::Interrupted,
            _ => Self::GeneralError,
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DR001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
