// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend gateway for Selves.
//!
//! [`ProxyGateway`] implements [`BackendGateway`]: it windows the history,
//! posts `{systemPrompt, messages}` to the chat proxy, and turns whatever comes
//! back (reply, error status, plain text, or nothing at all) into chat text.

pub mod client;
pub mod history;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use selves_config::model::BackendConfig;
use selves_core::traits::adapter::PluginAdapter;
use selves_core::traits::gateway::BackendGateway;
use selves_core::types::{AdapterType, HealthStatus, Message, PLACEHOLDER};
use selves_core::SelvesError;
use tracing::{debug, warn};

pub use client::{ProxyClient, ProxyOutcome};
pub use history::outgoing_messages;
pub use types::{ChatReply, ChatRequest, ProxyErrorBody, WireMessage};

/// Reply used when the proxy cannot be reached at all.
pub const TRANSPORT_FALLBACK: &str =
    "Sorry, I'm having trouble responding right now. Please try again in a moment.";

/// Gateway that talks to the chat proxy over HTTP.
pub struct ProxyGateway {
    client: ProxyClient,
    history_window: usize,
    model: Option<String>,
}

impl ProxyGateway {
    /// Creates a gateway from the `[backend]` config section.
    pub fn new(config: &BackendConfig) -> Result<Self, SelvesError> {
        let client = ProxyClient::new(&config.endpoint, Duration::from_secs(config.timeout_secs))?;
        Ok(Self {
            client,
            history_window: config.history_window.max(1),
            model: config.model.clone().filter(|m| !m.trim().is_empty()),
        })
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    fn build_request(
        &self,
        system_prompt: &str,
        history: &[Message],
        new_user_text: &str,
    ) -> ChatRequest {
        ChatRequest {
            system_prompt: system_prompt.to_string(),
            messages: outgoing_messages(history, new_user_text, self.history_window),
            model: self.model.clone(),
        }
    }
}

/// Turns a proxy outcome into the text shown in the conversation.
pub fn reply_text(outcome: ProxyOutcome) -> String {
    match outcome {
        ProxyOutcome::Success { body } => success_text(body),
        ProxyOutcome::Rejected {
            status,
            error,
            detail,
        } => {
            warn!(status, error = %error, "chat proxy rejected the exchange");
            match detail {
                Some(detail) => format!("API error ({status}): {error} ({detail})"),
                None => format!("API error ({status}): {error}"),
            }
        }
    }
}

fn success_text(body: String) -> String {
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(serde_json::Value::Object(map)) => {
            let content = match map.get("content") {
                Some(serde_json::Value::String(s)) => s.trim().to_string(),
                Some(serde_json::Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            if content.is_empty() {
                debug!("proxy reply had no content");
                PLACEHOLDER.to_string()
            } else {
                content
            }
        }
        _ if body.trim().is_empty() => PLACEHOLDER.to_string(),
        _ => {
            debug!("proxy reply is not a JSON object, using it as text");
            body
        }
    }
}

#[async_trait]
impl PluginAdapter for ProxyGateway {
    fn name(&self) -> &str {
        "chat-proxy"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Gateway
    }

    async fn health_check(&self) -> Result<HealthStatus, SelvesError> {
        match self.client.health().await {
            Ok(status) if status.is_success() => Ok(HealthStatus::Healthy),
            Ok(status) => Ok(HealthStatus::Degraded(format!(
                "proxy health endpoint answered {status}"
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("proxy unreachable: {e}"))),
        }
    }
}

#[async_trait]
impl BackendGateway for ProxyGateway {
    async fn exchange(
        &self,
        system_prompt: &str,
        history: &[Message],
        new_user_text: &str,
    ) -> String {
        let request = self.build_request(system_prompt, history, new_user_text);
        debug!(
            messages = request.messages.len(),
            endpoint = %self.client.endpoint(),
            "sending exchange"
        );

        match self.client.post_chat(&request).await {
            Ok(outcome) => reply_text(outcome),
            Err(e) => {
                warn!(error = %e, "chat proxy request failed");
                TRANSPORT_FALLBACK.to_string()
            }
        }
    }
}
