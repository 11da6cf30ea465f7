//! LLM Provider trait: the uniform capability set of every client.
//!
//! Implemented by [`AnthropicProvider`](crate::anthropic::AnthropicProvider)
//! and [`OpenAiProvider`](crate::openai::OpenAiProvider).

use async_trait::async_trait;

/// Text returned by `complete` whenever the provider could not be reached or
/// answered with an error.
pub const FALLBACK_RESPONSE: &str =
    "I apologize, but I'm having trouble connecting to my knowledge base right now. Please try again later.";

/// Hard upper bound on `max_tokens` for any single request.
pub const MAX_REQUEST_TOKENS: u32 = 4096;

/// Parameters for one completion request.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestParameters {
    /// Model identifier (e.g. `"claude-3-opus-20240229"`, `"gpt-4"`).
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f64,
}

impl RequestParameters {
    /// Build parameters bounded by the provider's ceiling for `model`.
    ///
    /// `max_tokens` ends up in `[1, min(ceiling, MAX_REQUEST_TOKENS)]`,
    /// `temperature` in `[0, 1]` (non-finite values become `0.0`).
    pub fn bounded(
        provider: &dyn LlmProvider,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f64,
    ) -> Self {
        let model = model.into();
        let ceiling = provider.max_tokens_for(&model).clamp(1, MAX_REQUEST_TOKENS);
        let temperature = if temperature.is_finite() {
            temperature.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            max_tokens: max_tokens.clamp(1, ceiling),
            model,
            temperature,
        }
    }
}

/// Trait that both LLM providers implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send `content` as a single user message and return the model's text.
    ///
    /// Never fails: transport and API errors are logged and replaced by
    /// [`FALLBACK_RESPONSE`]. A response without text yields `""`.
    async fn complete(&self, content: &str, params: &RequestParameters) -> String;

    /// Available model identifiers.
    ///
    /// Served from the model cache when fresh; otherwise fetched live, or
    /// taken from the provider's fallback list, and written back to the cache.
    async fn list_models(&self) -> Vec<String>;

    /// Token ceiling for `model`.
    fn max_tokens_for(&self, model: &str) -> u32;

    /// Display name for logging and the model cache key.
    fn display_name(&self) -> &str;
}
