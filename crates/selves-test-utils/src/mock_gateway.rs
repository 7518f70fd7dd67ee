// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock backend gateway for deterministic testing.
//!
//! Replies are popped from a FIFO queue; every call is recorded. A gated
//! mock parks each exchange until the test releases it, which makes
//! in-flight states observable.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Semaphore};

use selves_core::traits::adapter::PluginAdapter;
use selves_core::traits::gateway::BackendGateway;
use selves_core::types::{AdapterType, HealthStatus, Message};
use selves_core::SelvesError;

/// Reply used when the queue is empty.
pub const DEFAULT_REPLY: &str = "mock reply";

/// One recorded `exchange` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedExchange {
    pub system_prompt: String,
    pub history: Vec<Message>,
    pub new_user_text: String,
}

pub struct MockGateway {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<RecordedExchange>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::with_replies(Vec::new())
    }

    /// A mock pre-loaded with replies, returned in order.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Makes every exchange wait for [`release`](Self::release).
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Lets `n` parked (or future) exchanges finish.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub async fn push_reply(&self, text: impl Into<String>) {
        self.replies.lock().await.push_back(text.into());
    }

    /// Every exchange seen so far, in call order.
    pub async fn calls(&self) -> Vec<RecordedExchange> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Gateway
    }

    async fn health_check(&self) -> Result<HealthStatus, SelvesError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl BackendGateway for MockGateway {
    async fn exchange(
        &self,
        system_prompt: &str,
        history: &[Message],
        new_user_text: &str,
    ) -> String {
        self.calls.lock().await.push(RecordedExchange {
            system_prompt: system_prompt.to_string(),
            history: history.to_vec(),
            new_user_text: new_user_text.to_string(),
        });

        if let Some(gate) = &self.gate
            && let Ok(permit) = gate.acquire().await
        {
            permit.forget();
        }

        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| DEFAULT_REPLY.to_string())
    }
}
