//! fmmaker core: settings, exported run configuration, and the model cache.
//!
//! - [`config`]: persisted credentials and defaults (`settings.json`)
//! - [`run_config`]: TOML export/import of a run's input selections
//! - [`model_cache`]: per-provider model lists with a 7-day expiry
//! - [`utils`]: data paths and file naming helpers

pub mod config;
pub mod model_cache;
pub mod run_config;
pub mod utils;

pub use config::Settings;
pub use model_cache::ModelCache;
pub use run_config::{ApiSection, RunConfig, RunConfigError, RunSelection};
