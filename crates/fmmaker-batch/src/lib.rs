//! fmmaker batch: turns a prompt template and a list of files into
//! front-matter documents.
//!
//! This crate contains:
//! - **job**: the job description and its validation
//! - **merge**: placeholder substitution and output layout
//! - **orchestrator**: the sequential background worker and its handle
//! - **events**: batch states and progress notifications

pub mod events;
pub mod job;
pub mod merge;
pub mod orchestrator;

pub use events::{BatchState, ProgressEvent};
pub use job::{ProcessingJob, ValidationError};
pub use merge::{merge_template, render_output, PLACEHOLDER};
pub use orchestrator::{start_batch, BatchHandle, BatchReport, Orchestrator};
