//! Shared HTTP plumbing for the provider clients.
//!
//! Both clients build their requests themselves and hand them to
//! [`send_json`], which turns every failure mode into an [`HttpError`].

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Per-request timeout for provider calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Why a provider request did not produce a decoded body.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Build the HTTP client shared by one provider instance.
///
/// Falls back to the default client if the builder fails (TLS backend init).
pub fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to build HTTP client, using defaults");
            reqwest::Client::new()
        })
}

/// Send a request and decode a JSON body, mapping non-2xx statuses to errors.
pub async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, HttpError> {
    let response = request.send().await.map_err(HttpError::Transport)?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        return Err(HttpError::Status { status, body });
    }

    response.json::<T>().await.map_err(HttpError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, serde::Deserialize)]
    struct Pong {
        ok: bool,
    }

    #[tokio::test]
    async fn test_send_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let client = build_client();
        let pong: Pong = send_json(client.get(format!("{}/ping", server.uri())))
            .await
            .unwrap();
        assert!(pong.ok);
    }

    #[tokio::test]
    async fn test_send_json_status_error_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = send_json::<Pong>(build_client().get(server.uri()))
            .await
            .unwrap_err();
        match err {
            HttpError::Status { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_send_json_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = send_json::<Pong>(build_client().get(server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Decode(_)));
    }

    #[tokio::test]
    async fn test_send_json_transport_error() {
        let err = send_json::<Pong>(build_client().get("http://127.0.0.1:1/"))
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::Transport(_)));
    }
}
