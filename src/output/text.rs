//! Human-readable run summary for the terminal.
//!
//! Colors come from `yansi`; they are dropped globally when the user passes
//! `--no-color` or sets `NO_COLOR`.

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::Paint;

use crate::actions::Action;
use crate::runner::{ErrorKind, RunResult};

/// Text output formatter.
pub struct TextOutput<'a> {
    result: &'a RunResult,
}

impl<'a> TextOutput<'a> {
    /// Create a text formatter for `result`.
    #[must_use]
    pub fn new(result: &'a RunResult) -> Self {
        Self { result }
    }

    /// Write the summary block.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let r = self.result;

        writeln!(writer)?;
        writeln!(writer, "{}", "Summary".bold())?;
        writeln!(writer, "  Mode:             {}", r.mode.description())?;
        writeln!(writer, "  Files scanned:    {}", r.scanned_count)?;
        writeln!(writer, "  Duplicate groups: {}", r.duplicate_group_count)?;
        writeln!(writer, "  Candidates:       {}", r.candidates.len())?;

        if r.dry_run {
            let verb = match r.action {
                Action::Move => "Would move:      ",
                Action::Delete => "Would delete:    ",
            };
            writeln!(
                writer,
                "  {} {} ({})",
                verb,
                r.candidates.len().yellow(),
                ByteSize::b(r.candidate_bytes())
            )?;
        } else {
            match r.action {
                Action::Move => writeln!(writer, "  Moved:            {}", r.moved_count().green())?,
                Action::Delete => {
                    writeln!(writer, "  Deleted:          {}", r.deleted_count().green())?
                }
            }
            if r.skipped_count() > 0 {
                writeln!(writer, "  Skipped:          {}", r.skipped_count().yellow())?;
            }
            if r.failed_count() > 0 {
                writeln!(writer, "  Failed:           {}", r.failed_count().red())?;
            }
            writeln!(
                writer,
                "  Space reclaimed:  {}",
                ByteSize::b(r.bytes_reclaimed).cyan()
            )?;
        }

        if let Some(ref dir) = r.quarantine_dir {
            writeln!(writer, "  Quarantine:       {}", dir.display())?;
        }
        writeln!(writer, "  Duration:         {} ms", r.duration_ms)?;

        if r.interrupted {
            writeln!(
                writer,
                "{}",
                "Interrupted: remaining candidates were left untouched.".yellow()
            )?;
        }

        if r.has_errors() {
            writeln!(writer)?;
            writeln!(writer, "{} ({})", "Errors".red().bold(), r.errors.len())?;
            for e in &r.errors {
                let kind = match e.kind {
                    ErrorKind::Scan => "scan",
                    ErrorKind::Action => "action",
                };
                writeln!(writer, "  [{}] {}", kind, e.reason)?;
            }
        }

        Ok(())
    }

    /// Render to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if formatting fails.
    pub fn to_string(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
