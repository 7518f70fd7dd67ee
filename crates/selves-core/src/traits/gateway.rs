// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend gateway trait: one request/response round trip to the model proxy.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;
use crate::types::Message;

/// Sends a system prompt, prior history, and a new user message to the model
/// backend and returns the reply text.
#[async_trait]
pub trait BackendGateway: PluginAdapter {
    /// Performs one exchange.
    ///
    /// Never fails: transport and upstream errors come back as user-visible
    /// fallback text, and the result is never an empty string.
    /// `history` is the log before `new_user_text` was added; placeholder
    /// messages in it are ignored.
    async fn exchange(&self, system_prompt: &str, history: &[Message], new_user_text: &str)
    -> String;
}
