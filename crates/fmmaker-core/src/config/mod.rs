//! Settings system: schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use fmmaker_core::config;
//!
//! let settings = config::load_settings(None);
//! println!("Service: {}", settings.service);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{get_settings_path, load_settings, save_settings, update_settings};
pub use schema::{Settings, SettingsUpdate};
