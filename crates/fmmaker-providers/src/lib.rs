//! LLM provider layer for fmmaker.
//!
//! # Architecture
//!
//! - [`traits::LlmProvider`]: capability set shared by both clients
//! - [`anthropic::AnthropicProvider`] / [`openai::OpenAiProvider`]: HTTP clients
//! - [`registry`]: static specs for the supported providers
//! - [`dispatch::resolve`]: service name + credential → client

pub mod anthropic;
pub mod dispatch;
pub mod http_provider;
pub mod openai;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use anthropic::AnthropicProvider;
pub use dispatch::{resolve, resolve_with_config, DispatchError};
pub use openai::OpenAiProvider;
pub use registry::{available_services, ProviderConfig, ProviderSpec, PROVIDERS};
pub use traits::{LlmProvider, RequestParameters, FALLBACK_RESPONSE};
