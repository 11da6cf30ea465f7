//! Settings loader: reads `~/.fmmaker/settings.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Settings::default()`)
//! 2. JSON file at `~/.fmmaker/settings.json` (created with defaults if absent)
//! 3. Environment variables `FMMAKER_<FIELD>` (override JSON, never saved)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Settings, SettingsUpdate};

/// Default settings file path.
pub fn get_settings_path() -> PathBuf {
    crate::utils::get_settings_path()
}

/// Load settings from the default path (or `path`) + env vars.
///
/// A missing file is created with default values. An unreadable or
/// malformed file falls back to `Settings::default()`.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let settings_path = path.map(PathBuf::from).unwrap_or_else(get_settings_path);
    apply_env_overrides(read_settings_file(&settings_path))
}

/// Read the settings file without env overrides.
///
/// First run writes the defaults to disk so the user has a file to edit.
pub fn read_settings_file(path: &Path) -> Settings {
    if !path.exists() {
        info!("No settings file found at {}, creating defaults", path.display());
        let settings = Settings::default();
        if let Err(e) = save_settings(&settings, Some(path)) {
            warn!("Failed to create settings file {}: {}", path.display(), e);
        }
        return settings;
    }

    debug!("Loading settings from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read settings file {}: {}", path.display(), e);
            return Settings::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(s) => s,
        Err(e) => {
            warn!("Failed to parse settings JSON: {}", e);
            Settings::default()
        }
    }
}

/// Save settings to disk (pretty-printed JSON).
pub fn save_settings(settings: &Settings, path: Option<&Path>) -> std::io::Result<()> {
    let settings_path = path.map(PathBuf::from).unwrap_or_else(get_settings_path);

    if let Some(parent) = settings_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(settings).map_err(std::io::Error::other)?;

    std::fs::write(&settings_path, json)?;
    debug!("Settings saved to {}", settings_path.display());
    Ok(())
}

/// Merge `update` into the stored settings and persist the result.
///
/// Only non-empty values are written; every other field keeps its stored
/// value. Env overrides are not involved, so they never leak into the file.
pub fn update_settings(update: &SettingsUpdate, path: Option<&Path>) -> std::io::Result<Settings> {
    let settings_path = path.map(PathBuf::from).unwrap_or_else(get_settings_path);

    let mut settings = read_settings_strict(&settings_path)?;
    settings.apply(update);
    save_settings(&settings, Some(&settings_path))?;
    info!(service = %settings.service, model = %settings.model, "settings saved");
    Ok(settings)
}

/// Read the stored settings for a read-modify-write cycle.
///
/// A missing file reads as defaults. An unreadable or malformed file is an
/// error so the caller never overwrites it with defaults.
fn read_settings_strict(path: &Path) -> std::io::Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("malformed settings file {}: {}", path.display(), e),
        )
    })
}

/// Apply environment variable overrides on top of loaded settings.
///
/// Supported overrides:
/// - `FMMAKER_ANTHROPIC_API_KEY` → `anthropic_api_key`
/// - `FMMAKER_OPENAI_API_KEY` → `openai_api_key`
/// - `FMMAKER_SERVICE` → `service`
/// - `FMMAKER_MODEL` → `model`
/// - `FMMAKER_TEMPERATURE` → `temperature`
fn apply_env_overrides(mut settings: Settings) -> Settings {
    if let Ok(val) = std::env::var("FMMAKER_ANTHROPIC_API_KEY") {
        settings.anthropic_api_key = val;
    }
    if let Ok(val) = std::env::var("FMMAKER_OPENAI_API_KEY") {
        settings.openai_api_key = val;
    }
    if let Ok(val) = std::env::var("FMMAKER_SERVICE") {
        settings.service = val;
    }
    if let Ok(val) = std::env::var("FMMAKER_MODEL") {
        settings.model = val;
    }
    if let Ok(val) = std::env::var("FMMAKER_TEMPERATURE") {
        if let Ok(t) = val.parse::<f64>() {
            if t.is_finite() {
                settings.temperature = t.clamp(0.0, 1.0);
            }
        }
    }

    settings
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
