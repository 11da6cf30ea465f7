//! Provider registry: static specs for the two supported LLM providers.
//!
//! Each `ProviderSpec` describes how to reach a provider and what to fall
//! back to when its model listing is unavailable.

// ─────────────────────────────────────────────
// ProviderKind / ProviderSpec
// ─────────────────────────────────────────────

/// Which client implementation a spec maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Anthropic,
    OpenAi,
}

/// Static specification describing one LLM provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Internal lowercase name (e.g. `"openai"`).
    pub name: &'static str,
    /// Human-readable name, also the model cache key. E.g. `"OpenAI"`.
    pub display_name: &'static str,
    /// Client implementation.
    pub kind: ProviderKind,
    /// Default API base URL (without the `/v1` path).
    pub default_api_base: &'static str,
    /// Model list used when the live listing fails, in display order.
    pub fallback_models: &'static [&'static str],
}

/// Per-request connection settings for one provider.
#[derive(Clone, Debug, Default)]
pub struct ProviderConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Custom API base URL (overrides the spec default).
    pub api_base: Option<String>,
}

impl ProviderConfig {
    /// Config with only a credential; the spec's default base URL is used.
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: None,
        }
    }

    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ─────────────────────────────────────────────
// Supported providers (in display order)
// ─────────────────────────────────────────────

/// Complete list of supported provider specifications.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        name: "anthropic",
        display_name: "Anthropic",
        kind: ProviderKind::Anthropic,
        default_api_base: "https://api.anthropic.com",
        fallback_models: &[
            "claude-3-opus-20240229",
            "claude-3-sonnet-20240229",
            "claude-3-haiku-20240307",
            "claude-2.1",
            "claude-2.0",
            "claude-instant-1.2",
        ],
    },
    ProviderSpec {
        name: "openai",
        display_name: "OpenAI",
        kind: ProviderKind::OpenAi,
        default_api_base: "https://api.openai.com",
        fallback_models: &[
            "gpt-4-0125-preview",
            "gpt-4-turbo-preview",
            "gpt-4-1106-preview",
            "gpt-4-vision-preview",
            "gpt-4",
            "gpt-4-0314",
            "gpt-4-0613",
            "gpt-4-32k",
            "gpt-4-32k-0314",
            "gpt-4-32k-0613",
            "gpt-3.5-turbo",
            "gpt-3.5-turbo-16k",
            "gpt-3.5-turbo-0301",
            "gpt-3.5-turbo-0613",
            "gpt-3.5-turbo-1106",
            "gpt-3.5-turbo-16k-0613",
        ],
    },
];

/// Find a provider spec by name, case-insensitively (`"OpenAI"`, `"openai"`).
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    let name = name.trim();
    PROVIDERS
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name))
}

/// Display names of all supported services.
pub fn available_services() -> Vec<&'static str> {
    PROVIDERS.iter().map(|spec| spec.display_name).collect()
}

impl ProviderSpec {
    /// Fallback model list as owned strings.
    pub fn fallback_model_list(&self) -> Vec<String> {
        self.fallback_models.iter().map(|m| m.to_string()).collect()
    }

    /// Resolve the base URL: config override > spec default. Trailing slashes removed.
    pub fn api_base(&self, config: &ProviderConfig) -> String {
        config
            .api_base
            .as_deref()
            .unwrap_or(self.default_api_base)
            .trim_end_matches('/')
            .to_string()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
