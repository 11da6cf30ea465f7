//! Anthropic Messages API client.
//!
//! - `POST {base}/v1/messages` for completions
//! - `GET {base}/v1/models` for the model listing (provider order kept)
//!
//! Authenticated with the `x-api-key` header plus a pinned `anthropic-version`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use fmmaker_core::ModelCache;

use crate::http_provider::{build_client, send_json};
use crate::registry::{ProviderConfig, ProviderSpec};
use crate::traits::{LlmProvider, RequestParameters, FALLBACK_RESPONSE};

/// API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Token ceiling applied to every Anthropic model.
pub const ANTHROPIC_MAX_TOKENS: u32 = 4096;

/// Page size requested from `/v1/models` (the API maximum).
const MODEL_PAGE_LIMIT: u32 = 1000;

/// Upper bound on listing pages fetched in one refresh.
const MAX_MODEL_PAGES: usize = 10;

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: [UserMessage<'a>; 1],
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelInfo>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    last_id: Option<String>,
}

#[derive(Deserialize)]
struct ModelInfo {
    id: String,
}

// ─────────────────────────────────────────────
// AnthropicProvider
// ─────────────────────────────────────────────

/// Client for Anthropic's Messages API.
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    cache: ModelCache,
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("api_base", &self.api_base)
            .field("cache", &self.cache.path())
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(config: &ProviderConfig, spec: &'static ProviderSpec, cache: ModelCache) -> Self {
        Self {
            client: build_client(),
            api_base: spec.api_base(config),
            api_key: config.api_key.clone(),
            cache,
            spec,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.api_base, path))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
    }

    /// Fetch every page of the model listing, in provider order.
    async fn fetch_models(&self) -> Result<Vec<String>, crate::http_provider::HttpError> {
        let mut models = Vec::new();
        let mut after_id: Option<String> = None;

        for _ in 0..MAX_MODEL_PAGES {
            let path = match &after_id {
                Some(id) => format!("/v1/models?limit={MODEL_PAGE_LIMIT}&after_id={id}"),
                None => format!("/v1/models?limit={MODEL_PAGE_LIMIT}"),
            };

            let page: ModelList = send_json(self.request(reqwest::Method::GET, &path)).await?;
            models.extend(page.data.into_iter().map(|m| m.id));

            match page.last_id {
                Some(last) if page.has_more => after_id = Some(last),
                _ => return Ok(models),
            }
        }

        warn!(pages = MAX_MODEL_PAGES, "model listing still paginating, truncated");
        Ok(models)
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(&self, content: &str, params: &RequestParameters) -> String {
        debug!(
            provider = self.spec.display_name,
            model = %params.model,
            max_tokens = params.max_tokens,
            chars = content.len(),
            "Calling LLM"
        );

        let body = MessagesRequest {
            model: &params.model,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            messages: [UserMessage {
                role: "user",
                content,
            }],
        };

        let request = self.request(reqwest::Method::POST, "/v1/messages").json(&body);
        match send_json::<MessagesResponse>(request).await {
            Ok(resp) => resp
                .content
                .into_iter()
                .find_map(|block| block.text)
                .unwrap_or_default(),
            Err(e) => {
                error!(provider = self.spec.display_name, error = %e, "Error calling Anthropic API");
                FALLBACK_RESPONSE.to_string()
            }
        }
    }

    async fn list_models(&self) -> Vec<String> {
        let key = self.spec.display_name;
        if let Some(models) = self.cache.get(key).filter(|m| !m.is_empty()) {
            return models;
        }

        let models = match self.fetch_models().await {
            Ok(models) if !models.is_empty() => models,
            Ok(_) => {
                warn!(provider = key, "model listing was empty, using defaults");
                self.spec.fallback_model_list()
            }
            Err(e) => {
                warn!(provider = key, error = %e, "Error fetching models, using defaults");
                self.spec.fallback_model_list()
            }
        };

        if let Err(e) = self.cache.put(key, &models) {
            warn!(provider = key, error = %e, "failed to write model cache");
        }
        models
    }

    fn max_tokens_for(&self, _model: &str) -> u32 {
        ANTHROPIC_MAX_TOKENS
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
