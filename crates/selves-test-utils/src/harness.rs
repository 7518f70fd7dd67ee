// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end engine tests.
//!
//! `TestHarness` wires a [`ConversationEngine`] to a [`MockGateway`] and a
//! real `SessionStore`, backed by a temp SQLite file unless an in-memory
//! store is supplied.

use std::sync::Arc;
use std::time::Duration;

use selves_agent::ConversationEngine;
use selves_config::model::StorageConfig;
use selves_core::{Persona, PersonaProfile, PersonaRecord, SelvesError, StorageAdapter};
use selves_storage::{SessionStore, SqliteStorage};

use crate::memory_storage::MemoryStorage;
use crate::mock_gateway::MockGateway;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    replies: Vec<String>,
    gated: bool,
    past: PersonaRecord,
    future: PersonaRecord,
    memory: Option<Arc<MemoryStorage>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            replies: Vec::new(),
            gated: false,
            past: PersonaRecord::new("Mara", "first-year design student").with_age(19),
            future: PersonaRecord::new("Mara at 40", "design lead, two kids")
                .with_description("patient and settled"),
            memory: None,
        }
    }

    /// Queue gateway replies.
    pub fn with_replies(mut self, replies: Vec<&str>) -> Self {
        self.replies = replies.into_iter().map(str::to_string).collect();
        self
    }

    /// Park every exchange until `gateway.release()`.
    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    pub fn with_personas(mut self, past: PersonaRecord, future: PersonaRecord) -> Self {
        self.past = past;
        self.future = future;
        self
    }

    /// Use an in-memory store instead of a temp SQLite file.
    pub fn with_memory_storage(mut self, storage: Arc<MemoryStorage>) -> Self {
        self.memory = Some(storage);
        self
    }

    pub async fn build(self) -> Result<TestHarness, SelvesError> {
        let (storage, temp_dir): (Arc<dyn StorageAdapter>, _) = match self.memory {
            Some(memory) => (memory as Arc<dyn StorageAdapter>, None),
            None => {
                let temp_dir = tempfile::TempDir::new()
                    .map_err(|e| SelvesError::Storage { source: e.into() })?;
                let config = StorageConfig {
                    database_path: temp_dir
                        .path()
                        .join("test.db")
                        .to_string_lossy()
                        .into_owned(),
                    wal_mode: true,
                };
                let storage = SqliteStorage::open(&config).await?;
                (Arc::new(storage) as Arc<dyn StorageAdapter>, Some(temp_dir))
            }
        };

        let sessions = Arc::new(SessionStore::new(storage.clone()));
        let profile = sessions.confirm_personas(self.past, self.future).await?;

        let gateway = MockGateway::with_replies(self.replies);
        let gateway = Arc::new(if self.gated { gateway.gated() } else { gateway });

        let engine = ConversationEngine::start(
            profile.clone(),
            gateway.clone(),
            sessions.clone(),
        )
        .await?;

        Ok(TestHarness {
            engine: Arc::new(engine),
            gateway,
            storage,
            sessions,
            profile,
            _temp_dir: temp_dir,
        })
    }
}

/// A running engine with mock collaborators.
pub struct TestHarness {
    pub engine: Arc<ConversationEngine>,
    pub gateway: Arc<MockGateway>,
    pub storage: Arc<dyn StorageAdapter>,
    pub sessions: Arc<SessionStore>,
    pub profile: PersonaProfile,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub async fn send(&self, persona: Persona, text: &str) -> Result<String, SelvesError> {
        self.engine.send(persona, text).await
    }

    /// A fresh engine over the same storage and gateway, as after a restart.
    pub async fn restart(&self) -> Result<ConversationEngine, SelvesError> {
        ConversationEngine::start(
            self.profile.clone(),
            self.gateway.clone(),
            self.sessions.clone(),
        )
        .await
    }

    /// Spawns a send and waits until its placeholder is in place.
    ///
    /// Meant for gated harnesses; an ungated send may finish before it is seen.
    pub async fn spawn_send(
        &self,
        persona: Persona,
        text: &str,
    ) -> tokio::task::JoinHandle<Result<String, SelvesError>> {
        let engine = self.engine.clone();
        let text = text.to_string();
        let handle = tokio::spawn(async move { engine.send(persona, &text).await });
        self.wait_until_pending(persona).await;
        handle
    }

    /// Yields until `persona` has an exchange in flight (bounded to 5s).
    pub async fn wait_until_pending(&self, persona: Persona) {
        let engine = self.engine.clone();
        let waited = tokio::time::timeout(Duration::from_secs(5), async move {
            while !engine.is_pending(persona) {
                tokio::task::yield_now().await;
            }
        })
        .await;
        assert!(waited.is_ok(), "{persona} never became pending");
    }
}
