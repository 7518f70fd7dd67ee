// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the chat proxy.
//!
//! [`ProxyClient`] performs the raw round trip and classifies the answer.
//! Turning an outcome into chat text is left to the gateway.

use std::time::Duration;

use reqwest::Url;
use selves_core::SelvesError;
use tracing::debug;

use crate::types::{ChatRequest, ProxyErrorBody};

/// Longest error body echoed back into a chat message.
const MAX_DETAIL_CHARS: usize = 200;

/// What the proxy answered, once a response arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyOutcome {
    /// 2xx with its raw body.
    Success { body: String },
    /// Non-2xx, with whatever error the proxy described.
    Rejected {
        status: u16,
        error: String,
        detail: Option<String>,
    },
}

/// HTTP client bound to one proxy endpoint.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl ProxyClient {
    /// Creates a client for `endpoint` with a per-request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SelvesError> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            SelvesError::Config(format!("invalid backend endpoint `{endpoint}`: {e}"))
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SelvesError::Gateway {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Posts `request` and reads the full response.
    ///
    /// Only transport problems (connect, timeout, body read) are errors.
    pub async fn post_chat(&self, request: &ChatRequest) -> Result<ProxyOutcome, reqwest::Error> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, bytes = body.len(), "proxy response received");

        if status.is_success() {
            return Ok(ProxyOutcome::Success { body });
        }

        let outcome = match serde_json::from_str::<ProxyErrorBody>(&body) {
            Ok(parsed) => ProxyOutcome::Rejected {
                status: status.as_u16(),
                error: parsed.error,
                detail: parsed.detail.filter(|d| !d.trim().is_empty()),
            },
            Err(_) => ProxyOutcome::Rejected {
                status: status.as_u16(),
                error: "unknown".to_string(),
                detail: Some(truncate(body.trim(), MAX_DETAIL_CHARS)).filter(|d| !d.is_empty()),
            },
        };
        Ok(outcome)
    }

    /// `GET /health` on the endpoint's origin.
    pub async fn health(&self) -> Result<reqwest::StatusCode, reqwest::Error> {
        let mut url = self.endpoint.clone();
        url.set_path("/health");
        url.set_query(None);
        let response = self.client.get(url).send().await?;
        Ok(response.status())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::types::WireMessage;

    fn request() -> ChatRequest {
        ChatRequest {
            system_prompt: "sys".into(),
            messages: vec![WireMessage::new("user", "hi")],
            model: None,
        }
    }

    fn client(server: &MockServer) -> ProxyClient {
        ProxyClient::new(
            &format!("{}/api/openai-chat", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn rejects_unparsable_endpoint() {
        let err = ProxyClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, SelvesError::Config(_)));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé…");
        assert_eq!(truncate("short", 10), "short");
    }

    #[tokio::test]
    async fn posts_contract_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/openai-chat"))
            .and(body_json(serde_json::json!({
                "systemPrompt": "sys",
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"content\":\"ok\"}"))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client(&server).post_chat(&request()).await.unwrap();
        assert_eq!(
            outcome,
            ProxyOutcome::Success {
                body: "{\"content\":\"ok\"}".into()
            }
        );
    }

    #[tokio::test]
    async fn non_json_error_body_becomes_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let outcome = client(&server).post_chat(&request()).await.unwrap();
        assert_eq!(
            outcome,
            ProxyOutcome::Rejected {
                status: 502,
                error: "unknown".into(),
                detail: Some("Bad Gateway".into()),
            }
        );
    }

    #[tokio::test]
    async fn health_hits_origin() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let status = client(&server).health().await.unwrap();
        assert!(status.is_success());
    }
}
