// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request shape expected by the LocalAI vendor endpoint.

use serde::Serialize;
use selves_gateway::WireMessage;

/// Body posted to `<upstream_base_url>/<project_id>`.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamRequest<'a> {
    pub api_token: &'a str,
    pub task: &'static str,
    /// Always present, even when empty.
    pub model: &'a str,
    pub messages: Vec<WireMessage>,
}

impl<'a> UpstreamRequest<'a> {
    /// A chat task with the system prompt as the leading message.
    pub fn chat(
        api_token: &'a str,
        model: &'a str,
        system_prompt: &str,
        messages: &[WireMessage],
    ) -> Self {
        let messages = std::iter::once(WireMessage::new("system", system_prompt))
            .chain(messages.iter().cloned())
            .collect();
        Self {
            api_token,
            task: "chat",
            model,
            messages,
        }
    }
}

/// Extracts reply text from an upstream 2xx body.
///
/// JSON bodies yield their `content` (empty when missing); anything else is
/// passed through as text.
pub fn upstream_content(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => match json.get("content") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        },
        Err(_) => body.to_string(),
    }
}
