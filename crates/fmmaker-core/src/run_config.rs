//! Exported run configuration: a TOML snapshot of a run's selections.
//!
//! ```toml
//! [Paths]
//! prompt_file = "prompts/summary.txt"
//! text_files = ["notes/a.txt", "notes/b.txt"]
//! output_dir = "out"
//! reference = "Smith 2021"
//!
//! [API]
//! service = "Anthropic"
//! model = "claude-3-opus-20240229"
//! max_tokens = 4096
//! temperature = 0.0
//!
//! [Reference]
//! reference = "Smith 2021"
//! ```
//!
//! Credentials are never exported. Loading restores only the `[Paths]` section.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Errors from reading or writing a run configuration file.
#[derive(Debug, Error)]
pub enum RunConfigError {
    #[error("failed to access run config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid run config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize run config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Input selections of a run: the part that is restored on load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSelection {
    pub prompt_file: String,
    pub text_files: Vec<String>,
    pub output_dir: String,
    pub reference: String,
}

/// Request parameters recorded alongside the selections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub service: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            service: crate::config::schema::DEFAULT_SERVICE.to_string(),
            model: crate::config::schema::DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            temperature: crate::config::schema::DEFAULT_TEMPERATURE,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSection {
    pub reference: String,
}

/// Whole exported file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    #[serde(rename = "Paths")]
    pub paths: RunSelection,
    #[serde(rename = "API")]
    pub api: ApiSection,
    #[serde(rename = "Reference")]
    pub reference: ReferenceSection,
}

impl RunConfig {
    /// Build an export from the current selections and parameters.
    pub fn new(selection: RunSelection, api: ApiSection) -> Self {
        let reference = ReferenceSection {
            reference: selection.reference.clone(),
        };
        Self {
            paths: selection,
            api,
            reference,
        }
    }

    /// Write the configuration to `path` as TOML.
    pub fn save(&self, path: &Path) -> Result<(), RunConfigError> {
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| RunConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "run configuration saved");
        Ok(())
    }

    /// Read a full configuration file.
    pub fn read(path: &Path) -> Result<Self, RunConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| RunConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| RunConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Restore the input selections stored in `path`.
    ///
    /// Blank entries in `text_files` are dropped.
    pub fn load_selection(path: &Path) -> Result<RunSelection, RunConfigError> {
        let mut selection = Self::read(path)?.paths;
        selection.text_files.retain(|f| !f.trim().is_empty());
        info!(
            path = %path.display(),
            files = selection.text_files.len(),
            "run configuration loaded"
        );
        Ok(selection)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
