//! Dispatcher: maps a service name to a freshly built provider client.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use fmmaker_core::ModelCache;

use crate::anthropic::AnthropicProvider;
use crate::openai::OpenAiProvider;
use crate::registry::{available_services, find_by_name, ProviderConfig, ProviderKind};
use crate::traits::LlmProvider;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Unknown service: {name} (expected one of: {expected})")]
    UnknownProvider { name: String, expected: String },
}

/// Build a provider client for `provider_name` authenticated with `credential`.
///
/// Every call constructs a new client; nothing is shared between calls.
pub fn resolve(
    provider_name: &str,
    credential: &str,
    cache: &ModelCache,
) -> Result<Arc<dyn LlmProvider>, DispatchError> {
    resolve_with_config(provider_name, &ProviderConfig::with_key(credential), cache)
}

/// Like [`resolve`], with a full config (custom base URL for proxies or tests).
pub fn resolve_with_config(
    provider_name: &str,
    config: &ProviderConfig,
    cache: &ModelCache,
) -> Result<Arc<dyn LlmProvider>, DispatchError> {
    let spec = find_by_name(provider_name).ok_or_else(|| DispatchError::UnknownProvider {
        name: provider_name.to_string(),
        expected: available_services().join(", "),
    })?;

    debug!(
        provider = spec.display_name,
        api_base = %spec.api_base(config),
        key_set = config.is_configured(),
        "Creating LLM provider"
    );

    let provider: Arc<dyn LlmProvider> = match spec.kind {
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(config, spec, cache.clone())),
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(config, spec, cache.clone())),
    };
    Ok(provider)
}
