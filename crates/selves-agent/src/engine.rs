// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dual-persona conversation engine.
//!
//! Each persona has its own lane. A send appends the user message and a
//! placeholder, runs one gateway exchange, swaps the placeholder (by index)
//! for the reply, then persists a full snapshot. The lane table sits behind a
//! short-lived std mutex that is never held across an await, so one persona
//! stays usable while the other waits on the backend.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use selves_context::{build_system_prompt, greeting};
use selves_core::{
    BackendGateway, ConversationLog, Message, Persona, PersonaProfile, SelvesError,
    SessionSnapshot, SnapshotStore,
};
use tracing::{debug, info, warn};

use crate::lane::{INTERRUPTED_NOTICE, Lane, Lanes};

/// Conversation state for one confirmed persona profile.
pub struct ConversationEngine {
    profile: PersonaProfile,
    gateway: Arc<dyn BackendGateway>,
    store: Arc<dyn SnapshotStore>,
    lanes: Mutex<Lanes>,
    persist_lock: tokio::sync::Mutex<()>,
}

impl ConversationEngine {
    /// Builds the engine, restoring logs from the stored snapshot.
    ///
    /// A persona's log is restored when the snapshot belongs to this profile
    /// and holds messages for it; otherwise the log starts with one greeting.
    pub async fn start(
        profile: PersonaProfile,
        gateway: Arc<dyn BackendGateway>,
        store: Arc<dyn SnapshotStore>,
    ) -> Result<Self, SelvesError> {
        profile.validate()?;

        let snapshot = store.load().await.filter(|s| belongs_to(s, &profile));
        if snapshot.is_none() {
            debug!(session_id = %profile.session_id, "no prior snapshot for this profile");
        }

        let lane_for = |persona: Persona| {
            let restored = snapshot
                .as_ref()
                .map(|s| restorable(s.chat.get(persona)))
                .filter(|log| !log.is_empty());
            match restored {
                Some(log) => {
                    info!(persona = %persona, messages = log.len(), "restored conversation");
                    Lane::new(log)
                }
                None => {
                    let text = greeting(profile.persona(persona), persona);
                    Lane::new(vec![Message::assistant(text)].into())
                }
            }
        };
        let lanes = Lanes::new(lane_for(Persona::Past), lane_for(Persona::Future));

        Ok(Self {
            profile,
            gateway,
            store,
            lanes: Mutex::new(lanes),
            persist_lock: tokio::sync::Mutex::new(()),
        })
    }

    pub fn profile(&self) -> &PersonaProfile {
        &self.profile
    }

    /// Current log of `persona`, including a pending placeholder if any.
    pub fn log(&self, persona: Persona) -> ConversationLog {
        self.lanes().get(persona).log().clone()
    }

    pub fn is_pending(&self, persona: Persona) -> bool {
        self.lanes().get(persona).is_pending()
    }

    /// Snapshot of the session without in-flight placeholders.
    pub fn snapshot(&self) -> SessionSnapshot {
        let chat = self.lanes().settled();
        SessionSnapshot::new(&self.profile, chat)
    }

    /// Sends `text` to `persona` and returns the reply placed in its log.
    ///
    /// Rejected with no change to any log when the text is blank or when
    /// `persona` already has an exchange in flight. Backend failures are not
    /// errors: they come back as the reply text.
    pub async fn send(&self, persona: Persona, text: &str) -> Result<String, SelvesError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SelvesError::EmptyMessage);
        }

        let ticket = self.lanes().get_mut(persona).begin(persona, text)?;
        let pending = PendingReply {
            engine: self,
            persona,
            slot: ticket.slot,
            armed: true,
        };
        debug!(persona = %persona, slot = ticket.slot, "exchange started");

        let prompt = build_system_prompt(self.profile.persona(persona), persona);
        let reply = self.gateway.exchange(&prompt, &ticket.history, text).await;
        pending.complete(&reply);

        self.persist().await;
        Ok(reply)
    }

    /// Writes the current snapshot. Failures are logged, never returned.
    pub async fn persist(&self) {
        let _guard = self.persist_lock.lock().await;
        let snapshot = self.snapshot();
        if let Err(e) = self.store.save(&snapshot).await {
            warn!(error = %e, "failed to persist session snapshot");
        }
    }

    fn lanes(&self) -> MutexGuard<'_, Lanes> {
        self.lanes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Resolves a placeholder exactly once, even if the send future is dropped.
struct PendingReply<'a> {
    engine: &'a ConversationEngine,
    persona: Persona,
    slot: usize,
    armed: bool,
}

impl PendingReply<'_> {
    fn complete(mut self, reply: &str) {
        self.resolve(reply);
        self.armed = false;
    }

    fn resolve(&self, reply: &str) {
        let resolved = self
            .engine
            .lanes()
            .get_mut(self.persona)
            .resolve(self.slot, Message::assistant(reply));
        if !resolved {
            warn!(persona = %self.persona, slot = self.slot, "placeholder already gone");
        }
    }
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(persona = %self.persona, "exchange abandoned before a reply arrived");
            self.resolve(INTERRUPTED_NOTICE);
        }
    }
}

fn belongs_to(snapshot: &SessionSnapshot, profile: &PersonaProfile) -> bool {
    snapshot.session_id == profile.session_id && snapshot.created_at == profile.created_at
}

/// Stored log minus any leftover pending markers.
fn restorable(log: &ConversationLog) -> ConversationLog {
    log.iter()
        .filter(|m| !m.is_placeholder())
        .cloned()
        .collect::<Vec<_>>()
        .into()
}
