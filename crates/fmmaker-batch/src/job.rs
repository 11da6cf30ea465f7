//! Processing job: the inputs of one batch run, and their validation.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why a job was rejected before any work started.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select all required files and directories.")]
    MissingSelection,
    #[error("Prompt file not found: {}", .0.display())]
    PromptNotFound(PathBuf),
    #[error("Text file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("Output directory not found: {}", .0.display())]
    OutputDirNotFound(PathBuf),
}

/// One user-initiated batch: a prompt template applied to each input file.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessingJob {
    pub prompt_template_path: PathBuf,
    /// Processed in this order.
    pub input_file_paths: Vec<PathBuf>,
    pub output_directory: PathBuf,
    /// Trimmed, never blank.
    pub reference: Option<String>,
}

impl ProcessingJob {
    pub fn new(
        prompt_template_path: impl Into<PathBuf>,
        input_file_paths: Vec<PathBuf>,
        output_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            prompt_template_path: prompt_template_path.into(),
            input_file_paths,
            output_directory: output_directory.into(),
            reference: None,
        }
    }

    /// Attach a reference line. Blank strings clear it.
    pub fn with_reference(mut self, reference: Option<&str>) -> Self {
        self.reference = reference
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from);
        self
    }

    /// Check the job without touching any file contents.
    ///
    /// Order: empty selections, prompt file, each input file, output directory.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.prompt_template_path)
            || self.input_file_paths.is_empty()
            || is_blank(&self.output_directory)
        {
            return Err(ValidationError::MissingSelection);
        }
        if !self.prompt_template_path.exists() {
            return Err(ValidationError::PromptNotFound(self.prompt_template_path.clone()));
        }
        if let Some(missing) = self.input_file_paths.iter().find(|p| !p.exists()) {
            return Err(ValidationError::InputNotFound(missing.clone()));
        }
        if !self.output_directory.is_dir() {
            return Err(ValidationError::OutputDirNotFound(self.output_directory.clone()));
        }
        Ok(())
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().is_empty()
}
