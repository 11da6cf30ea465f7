//! OpenAI Chat Completions client.
//!
//! Live model listings keep only `gpt-` models, sorted lexicographically.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use fmmaker_core::ModelCache;

use crate::http_provider::{build_client, send_json, HttpError};
use crate::registry::{ProviderConfig, ProviderSpec};
use crate::traits::{LlmProvider, RequestParameters, FALLBACK_RESPONSE};

/// Ceiling reported for models missing from [`MODEL_MAX_TOKENS`].
pub const DEFAULT_MAX_TOKENS: u32 = 128_000;

/// Known per-model token ceilings.
pub static MODEL_MAX_TOKENS: &[(&str, u32)] = &[
    ("gpt-4-0125-preview", 128_000),
    ("gpt-4-turbo-preview", 128_000),
    ("gpt-4-1106-preview", 128_000),
    ("gpt-4-vision-preview", 128_000),
    ("gpt-4", 8192),
    ("gpt-4-0314", 8192),
    ("gpt-4-0613", 8192),
    ("gpt-4-32k", 32_768),
    ("gpt-4-32k-0314", 32_768),
    ("gpt-4-32k-0613", 32_768),
    ("gpt-3.5-turbo", 4096),
    ("gpt-3.5-turbo-16k", 16_384),
    ("gpt-3.5-turbo-0301", 4096),
    ("gpt-3.5-turbo-0613", 4096),
    ("gpt-3.5-turbo-1106", 16_384),
    ("gpt-3.5-turbo-16k-0613", 16_384),
];

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct ModelInfo {
    id: String,
}

// ─────────────────────────────────────────────
// OpenAiProvider
// ─────────────────────────────────────────────

/// Client for OpenAI's Chat Completions API.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    cache: ModelCache,
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_base", &self.api_base)
            .field("cache", &self.cache.path())
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: &ProviderConfig, spec: &'static ProviderSpec, cache: ModelCache) -> Self {
        Self {
            client: build_client(),
            api_base: spec.api_base(config),
            api_key: config.api_key.clone(),
            cache,
            spec,
        }
    }

    async fn fetch_models(&self) -> Result<Vec<String>, HttpError> {
        let request = self
            .client
            .get(format!("{}/v1/models", self.api_base))
            .bearer_auth(&self.api_key);
        let list: ModelList = send_json(request).await?;

        let mut models: Vec<String> = list
            .data
            .into_iter()
            .map(|m| m.id)
            .filter(|id| id.starts_with("gpt-"))
            .collect();
        models.sort();
        Ok(models)
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, content: &str, params: &RequestParameters) -> String {
        debug!(
            provider = self.spec.display_name,
            model = %params.model,
            max_tokens = params.max_tokens,
            chars = content.len(),
            "Calling LLM"
        );

        let body = ChatRequest {
            model: &params.model,
            messages: [ChatMessage {
                role: "user",
                content,
            }],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        let request = self
            .client
            .post(format!("{}/v1/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body);

        match send_json::<ChatResponse>(request).await {
            Ok(resp) => resp
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .unwrap_or_default(),
            Err(e) => {
                error!(provider = self.spec.display_name, error = %e, "Error calling OpenAI API");
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
                warn!(provider = key, "no gpt- models in listing, using defaults");
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

    fn max_tokens_for(&self, model: &str) -> u32 {
        MODEL_MAX_TOKENS
            .iter()
            .find(|(name, _)| *name == model)
            .map_or(DEFAULT_MAX_TOKENS, |(_, limit)| *limit)
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::find_by_name;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_provider(api_base: &str, dir: &tempfile::TempDir) -> OpenAiProvider {
        let config = ProviderConfig {
            api_key: "sk-test-123".to_string(),
            api_base: Some(api_base.to_string()),
        };
        let cache = ModelCache::new(Some(dir.path().join("model_cache.json")));
        OpenAiProvider::new(&config, find_by_name("openai").unwrap(), cache)
    }

    fn params() -> RequestParameters {
        RequestParameters {
            model: "gpt-4".to_string(),
            max_tokens: 512,
            temperature: 0.5,
        }
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test-123"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4",
                "max_tokens": 512,
                "temperature": 0.5,
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-1",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Hi there."},
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = make_provider(&server.uri(), &dir);
        assert_eq!(provider.complete("hello", &params()).await, "Hi there.");
    }

    #[tokio::test]
    async fn test_complete_null_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": null}}]
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = make_provider(&server.uri(), &dir);
        assert_eq!(provider.complete("hello", &params()).await, "");
    }

    #[tokio::test]
    async fn test_complete_rate_limited_returns_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"message": "Rate limit exceeded", "type": "rate_limit_error"}
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = make_provider(&server.uri(), &dir);
        assert_eq!(provider.complete("hello", &params()).await, FALLBACK_RESPONSE);
    }

    #[tokio::test]
    async fn test_complete_network_error_returns_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let provider = make_provider("http://127.0.0.1:1", &dir);
        assert_eq!(provider.complete("hello", &params()).await, FALLBACK_RESPONSE);
    }

    #[tokio::test]
    async fn test_list_models_filters_and_sorts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .and(header("Authorization", "Bearer sk-test-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "list",
                "data": [
                    {"id": "gpt-4o", "object": "model"},
                    {"id": "whisper-1", "object": "model"},
                    {"id": "gpt-3.5-turbo", "object": "model"},
                    {"id": "dall-e-3", "object": "model"},
                    {"id": "gpt-4", "object": "model"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = make_provider(&server.uri(), &dir);

        let expected = vec![
            "gpt-3.5-turbo".to_string(),
            "gpt-4".to_string(),
            "gpt-4o".to_string(),
        ];
        assert_eq!(provider.list_models().await, expected);
        assert_eq!(provider.list_models().await, expected);
        assert_eq!(provider.cache.get("OpenAI"), Some(expected));
    }

    #[tokio::test]
    async fn test_list_models_refetches_expired_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "list",
                "data": [{"id": "gpt-4o", "object": "model"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = make_provider(&server.uri(), &dir);
        let stale = chrono::Utc::now() - chrono::Duration::days(8);
        provider
            .cache
            .put_at("OpenAI", &["gpt-3.5-turbo".to_string()], stale)
            .unwrap();

        assert_eq!(provider.list_models().await, vec!["gpt-4o".to_string()]);
        assert_eq!(provider.cache.get("OpenAI"), Some(vec!["gpt-4o".to_string()]));
    }

    #[tokio::test]
    async fn test_list_models_fallback_keeps_insertion_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = make_provider(&server.uri(), &dir);

        let models = provider.list_models().await;
        assert_eq!(models.len(), 16);
        assert_eq!(models[0], "gpt-4-0125-preview");
        assert_eq!(models[15], "gpt-3.5-turbo-16k-0613");
        assert_eq!(provider.cache.get("OpenAI"), Some(models));
    }

    #[test]
    fn test_max_tokens_table() {
        let dir = tempfile::tempdir().unwrap();
        let provider = make_provider("http://localhost", &dir);
        assert_eq!(provider.max_tokens_for("gpt-4"), 8192);
        assert_eq!(provider.max_tokens_for("gpt-4-32k"), 32_768);
        assert_eq!(provider.max_tokens_for("gpt-3.5-turbo-1106"), 16_384);
        assert_eq!(provider.max_tokens_for("gpt-4o-mini"), DEFAULT_MAX_TOKENS);
        assert_eq!(provider.display_name(), "OpenAI");
    }
}
