//! Settings schema: credentials and default request parameters.
//!
//! JSON on disk uses the field names as written here (snake_case), e.g.
//! `{"anthropic_api_key": "", "openai_api_key": "", "temperature": 0.0,
//! "service": "Anthropic", "model": "claude-3-opus-20240229"}`.

use serde::{Deserialize, Serialize};

/// Service selected when nothing else is configured.
pub const DEFAULT_SERVICE: &str = "Anthropic";

/// Model selected when nothing else is configured.
pub const DEFAULT_MODEL: &str = "claude-3-opus-20240229";

/// Sampling temperature used when nothing else is configured.
pub const DEFAULT_TEMPERATURE: f64 = 0.0;

// ─────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────

/// Persisted user settings: loaded from `~/.fmmaker/settings.json` + env vars.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Anthropic API key.
    pub anthropic_api_key: String,
    /// OpenAI API key.
    pub openai_api_key: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f64,
    /// Selected provider display name (`"Anthropic"` or `"OpenAI"`).
    pub service: String,
    /// Selected model identifier.
    pub model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            anthropic_api_key: String::new(),
            openai_api_key: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            service: DEFAULT_SERVICE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Settings {
    /// API key for a service name, matched case-insensitively.
    ///
    /// Returns an empty string for services without a stored key.
    pub fn api_key_for(&self, service: &str) -> &str {
        if service.eq_ignore_ascii_case("anthropic") {
            &self.anthropic_api_key
        } else if service.eq_ignore_ascii_case("openai") {
            &self.openai_api_key
        } else {
            ""
        }
    }

    /// Apply an update, overwriting only the fields that carry a non-empty value.
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(key) = non_empty(&update.anthropic_api_key) {
            self.anthropic_api_key = key.to_string();
        }
        if let Some(key) = non_empty(&update.openai_api_key) {
            self.openai_api_key = key.to_string();
        }
        if let Some(t) = update.temperature {
            if t.is_finite() {
                self.temperature = t.clamp(0.0, 1.0);
            }
        }
        if let Some(service) = non_empty(&update.service) {
            self.service = service.to_string();
        }
        if let Some(model) = non_empty(&update.model) {
            self.model = model.to_string();
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// ─────────────────────────────────────────────
// SettingsUpdate
// ─────────────────────────────────────────────

/// User-supplied changes to [`Settings`]. `None` and blank strings leave the
/// stored value untouched.
#[derive(Clone, Debug, Default)]
pub struct SettingsUpdate {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub temperature: Option<f64>,
    pub service: Option<String>,
    pub model: Option<String>,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
