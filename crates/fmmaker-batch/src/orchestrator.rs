//! Request orchestrator: runs a [`ProcessingJob`] on a background task.
//!
//! One worker task processes the inputs strictly in order, one at a time:
//!
//! 1. Read the input file and merge it into the prompt template
//! 2. Send the merged text to the provider
//! 3. Write `<stem>.md` (model output + optional reference + original text)
//!
//! Progress goes out on an unbounded mpsc channel; the current
//! [`BatchState`] is published on a watch channel. There is no cancellation:
//! the worker runs until the batch completes or the first error aborts it.
//! Outputs already written are kept when a later file fails.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use fmmaker_core::utils::output_file_name;
use fmmaker_providers::{LlmProvider, RequestParameters};

use crate::events::{BatchState, ProgressEvent};
use crate::job::ProcessingJob;
use crate::merge::{merge_template, render_output, OUTPUT_EXTENSION};

// ─────────────────────────────────────────────
// BatchReport
// ─────────────────────────────────────────────

/// Outcome of one batch.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchReport {
    /// `Completed`, `Failed`, or `Idle` after a validation failure.
    pub state: BatchState,
    /// Output files written, in processing order.
    pub written: Vec<PathBuf>,
    /// Inputs for which the model returned an empty answer.
    pub skipped: Vec<PathBuf>,
    /// Free-text reason for a validation failure or abort.
    pub error: Option<String>,
}

impl BatchReport {
    fn new() -> Self {
        Self {
            state: BatchState::Idle,
            written: Vec::new(),
            skipped: Vec::new(),
            error: None,
        }
    }
}

// ─────────────────────────────────────────────
// Orchestrator
// ─────────────────────────────────────────────

/// Runs one batch against one provider with fixed request parameters.
pub struct Orchestrator {
    provider: Arc<dyn LlmProvider>,
    params: RequestParameters,
    events: mpsc::UnboundedSender<ProgressEvent>,
    state: watch::Sender<BatchState>,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        params: RequestParameters,
        events: mpsc::UnboundedSender<ProgressEvent>,
        state: watch::Sender<BatchState>,
    ) -> Self {
        Self {
            provider,
            params,
            events,
            state,
        }
    }

    /// Validate and process `job`, returning once the batch is over.
    pub async fn run(&self, job: &ProcessingJob) -> BatchReport {
        let mut report = BatchReport::new();

        self.set_state(BatchState::Validating);
        if let Err(e) = job.validate() {
            warn!(error = %e, "batch rejected");
            let message = e.to_string();
            self.emit(ProgressEvent::ValidationFailed {
                message: message.clone(),
            });
            report.error = Some(message);
            self.set_state(BatchState::Idle);
            return report;
        }

        let total = job.input_file_paths.len();
        self.set_state(BatchState::Running);
        self.emit(ProgressEvent::Started { total });
        info!(
            provider = self.provider.display_name(),
            model = %self.params.model,
            files = total,
            "batch started"
        );

        match self.process_all(job, &mut report).await {
            Ok(()) => {
                info!(
                    written = report.written.len(),
                    skipped = report.skipped.len(),
                    "batch completed"
                );
                self.emit(ProgressEvent::Finished {
                    written: report.written.len(),
                    skipped: report.skipped.len(),
                });
                report.state = BatchState::Completed;
            }
            Err(e) => {
                let message = format!("{e:#}");
                error!(error = %message, "batch aborted");
                self.emit(ProgressEvent::Failed {
                    message: message.clone(),
                });
                report.error = Some(message);
                report.state = BatchState::Failed;
            }
        }

        self.set_state(report.state);
        report
    }

    async fn process_all(&self, job: &ProcessingJob, report: &mut BatchReport) -> Result<()> {
        let total = job.input_file_paths.len();

        for (i, input) in job.input_file_paths.iter().enumerate() {
            self.emit(ProgressEvent::FileStarted {
                index: i + 1,
                total,
                path: input.clone(),
            });

            match self.process_file(job, input).await? {
                Some(output) => {
                    self.emit(ProgressEvent::FileWritten {
                        input: input.clone(),
                        output: output.clone(),
                    });
                    report.written.push(output);
                }
                None => {
                    self.emit(ProgressEvent::FileSkipped {
                        input: input.clone(),
                    });
                    report.skipped.push(input.clone());
                }
            }
        }
        Ok(())
    }

    /// Process one input. `Ok(None)` means the model answer was empty.
    async fn process_file(&self, job: &ProcessingJob, input: &Path) -> Result<Option<PathBuf>> {
        let template = tokio::fs::read_to_string(&job.prompt_template_path)
            .await
            .with_context(|| {
                format!(
                    "failed to read prompt file {}",
                    job.prompt_template_path.display()
                )
            })?;
        let original = tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("failed to read {}", input.display()))?;

        let merged = merge_template(&template, &original);
        let response = self.provider.complete(&merged, &self.params).await;
        let front_matter = response.trim();

        if front_matter.is_empty() {
            debug!(input = %input.display(), "empty model response, skipping");
            return Ok(None);
        }

        let output = job
            .output_directory
            .join(output_file_name(input, OUTPUT_EXTENSION));
        if same_file(input, &output).await {
            bail!(
                "output {} would overwrite its input file",
                output.display()
            );
        }

        let document = render_output(front_matter, job.reference.as_deref(), &original);
        tokio::fs::write(&output, document)
            .await
            .with_context(|| format!("failed to write {}", output.display()))?;
        debug!(input = %input.display(), output = %output.display(), "front matter written");
        Ok(Some(output))
    }

    fn emit(&self, event: ProgressEvent) {
        // A dropped receiver only means nobody is watching.
        let _ = self.events.send(event);
    }

    fn set_state(&self, state: BatchState) {
        debug!(%state, "batch state");
        self.state.send_replace(state);
    }
}

/// Whether both paths resolve to the same existing file.
async fn same_file(a: &Path, b: &Path) -> bool {
    match (tokio::fs::canonicalize(a).await, tokio::fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// ─────────────────────────────────────────────
// Command interface
// ─────────────────────────────────────────────

/// Handle to a batch running on the background worker.
pub struct BatchHandle {
    events: mpsc::UnboundedReceiver<ProgressEvent>,
    state: watch::Receiver<BatchState>,
    task: JoinHandle<BatchReport>,
}

impl BatchHandle {
    /// Drain the events emitted so far without waiting.
    pub fn get_progress_events(&mut self) -> Vec<ProgressEvent> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }

    /// Wait for the next event. `None` once the worker has finished and
    /// every event has been received.
    pub async fn next_event(&mut self) -> Option<ProgressEvent> {
        self.events.recv().await
    }

    /// Current state of the batch.
    pub fn state(&self) -> BatchState {
        *self.state.borrow()
    }

    /// Wait for the worker to finish.
    pub async fn wait(self) -> Result<BatchReport> {
        self.task.await.context("batch worker panicked")
    }
}

/// Start `job` on a new background task and return its handle.
///
/// Must be called inside a tokio runtime.
pub fn start_batch(
    job: ProcessingJob,
    params: RequestParameters,
    provider: Arc<dyn LlmProvider>,
) -> BatchHandle {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(BatchState::Idle);

    let orchestrator = Orchestrator::new(provider, params, events_tx, state_tx);
    let task = tokio::spawn(async move { orchestrator.run(&job).await });

    BatchHandle {
        events: events_rx,
        state: state_rx,
        task,
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
