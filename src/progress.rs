//! Progress reporting and run log delivery.
//!
//! The pipeline reports through the [`ProgressCallback`] trait: phase
//! boundaries, per-item progress, and human-readable log lines such as
//! `[DUP] ...` or `[MOVE] ...`. Three reporters are provided:
//!
//! - [`Progress`]: indicatif bars on the terminal, log lines printed above
//!   the bars
//! - [`ChannelProgress`]: forwards log lines over an mpsc channel
//! - [`LogProgress`]: forwards log lines to the `log` facade

use std::sync::mpsc::Sender;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Phase name for directory walking.
pub const PHASE_WALK: &str = "walking";
/// Phase name for content hashing.
pub const PHASE_HASH: &str = "hashing";
/// Phase name for moving or deleting candidates.
pub const PHASE_ACTION: &str = "actions";

/// Progress callback for the scan and action phases.
///
/// Implement this trait to receive progress updates during a run.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase ([`PHASE_WALK`], [`PHASE_HASH`], [`PHASE_ACTION`])
    /// * `total` - Total number of items to process, 0 if unknown
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Current item number (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when an item has been processed, providing its size.
    fn on_item_completed(&self, _bytes: u64) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called with a human-readable log line.
    fn on_message(&self, _message: &str) {}
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Progress reporter using indicatif.
///
/// Keeps one bar per phase. Log lines are printed above the bars so they
/// stay readable while a bar is active.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    hashing: Mutex<Option<ProgressBar>>,
    actions: Mutex<Option<ProgressBar>>,
    quiet: bool,
    show_messages: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is drawn and log lines are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupremover::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            walking: Mutex::new(None),
            hashing: Mutex::new(None),
            actions: Mutex::new(None),
            quiet,
            show_messages: true,
        }
    }

    /// Choose whether log lines are printed. Bars are unaffected.
    #[must_use]
    pub fn with_messages(mut self, show: bool) -> Self {
        self.show_messages = show;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn slot(&self, phase: &str) -> Option<&Mutex<Option<ProgressBar>>> {
        match phase {
            PHASE_WALK => Some(&self.walking),
            PHASE_HASH => Some(&self.hashing),
            PHASE_ACTION => Some(&self.actions),
            _ => None,
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }
        let Some(slot) = self.slot(phase) else {
            return;
        };

        let pb = if phase == PHASE_WALK {
            let pb = self.multi.add(ProgressBar::new_spinner());
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            let pb = self.multi.add(ProgressBar::new(total as u64));
            pb.set_style(Self::bar_style());
            pb
        };
        pb.set_message(phase.to_string());
        *lock(slot) = Some(pb);
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }
        for slot in [&self.actions, &self.hashing, &self.walking] {
            if let Some(ref pb) = *lock(slot) {
                pb.set_position(current as u64);
                pb.set_message(truncate_path(path, 30));
                return;
            }
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }
        if let Some(pb) = self.slot(phase).and_then(|slot| lock(slot).take()) {
            pb.finish_and_clear();
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet || !self.show_messages {
            return;
        }
        // println fails only when stderr is not a terminal; fall back to plain output
        if self.multi.println(message).is_err() {
            eprintln!("{message}");
        }
    }
}

/// Forwards log lines over a channel, for a front end that renders them
/// itself. Phase and item events are ignored.
pub struct ChannelProgress {
    sender: Mutex<Sender<String>>,
}

impl ChannelProgress {
    /// Create a reporter sending every log line to `sender`.
    #[must_use]
    pub fn new(sender: Sender<String>) -> Self {
        Self {
            sender: Mutex::new(sender),
        }
    }
}

impl ProgressCallback for ChannelProgress {
    fn on_phase_start(&self, _phase: &str, _total: usize) {}

    fn on_progress(&self, _current: usize, _path: &str) {}

    fn on_phase_end(&self, _phase: &str) {}

    fn on_message(&self, message: &str) {
        // A dropped receiver only means nobody is listening any more
        let _ = lock(&self.sender).send(message.to_string());
    }
}

/// Forwards log lines and phase boundaries to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressCallback for LogProgress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        log::debug!("Phase {phase} started ({total} items)");
    }

    fn on_progress(&self, current: usize, path: &str) {
        log::trace!("[{current}] {path}");
    }

    fn on_phase_end(&self, phase: &str) {
        log::debug!("Phase {phase} finished");
    }

    fn on_message(&self, message: &str) {
        log::info!("{message}");
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let count = file_name.chars().count();
    if count + 4 > max_len {
        let tail: String = file_name.chars().skip(count + 3 - max_len).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
