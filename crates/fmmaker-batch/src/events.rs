//! Batch state machine states and progress notifications.

use std::fmt;
use std::path::PathBuf;

/// Lifecycle of one batch: `Idle -> Validating -> Running -> (Completed | Failed)`.
///
/// A validation failure returns the machine to `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Validating,
    Running,
    Completed,
    Failed,
}

impl BatchState {
    /// Whether the worker is done with this batch.
    pub fn is_terminal(self) -> bool {
        matches!(self, BatchState::Completed | BatchState::Failed)
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BatchState::Idle => "idle",
            BatchState::Validating => "validating",
            BatchState::Running => "running",
            BatchState::Completed => "completed",
            BatchState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Notification emitted by the batch worker.
#[derive(Clone, Debug, PartialEq)]
pub enum ProgressEvent {
    /// Validation rejected the job; nothing was read or sent.
    ValidationFailed { message: String },
    /// Batch start.
    Started { total: usize },
    /// A file is about to be processed. `index` is 1-based.
    FileStarted { index: usize, total: usize, path: PathBuf },
    /// Output written for an input.
    FileWritten { input: PathBuf, output: PathBuf },
    /// Model returned nothing usable; no output for this input.
    FileSkipped { input: PathBuf },
    /// Batch end, every file processed.
    Finished { written: usize, skipped: usize },
    /// Batch end, aborted by an error.
    Failed { message: String },
}

impl ProgressEvent {
    /// One-line log text for the event.
    pub fn message(&self) -> String {
        match self {
            ProgressEvent::ValidationFailed { message } => format!("Error: {message}"),
            ProgressEvent::Started { total } => format!("Processing started... ({total} files)"),
            ProgressEvent::FileStarted { path, .. } => {
                format!("Processing file: {}", path.display())
            }
            ProgressEvent::FileWritten { output, .. } => {
                format!("Markdown content appended to {}", output.display())
            }
            ProgressEvent::FileSkipped { input } => format!(
                "No valid content found in the API response for {}.",
                input.display()
            ),
            ProgressEvent::Finished { written, skipped } => {
                format!("Processing complete! ({written} written, {skipped} skipped)")
            }
            ProgressEvent::Failed { message } => format!("Error: {message}"),
        }
    }

    /// Whether this is the last event of a batch.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            ProgressEvent::ValidationFailed { .. }
                | ProgressEvent::Finished { .. }
                | ProgressEvent::Failed { .. }
        )
    }
}
