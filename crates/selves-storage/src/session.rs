// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session-level records on top of a key/value [`StorageAdapter`].
//!
//! Three keys are used, matching the layout earlier clients wrote:
//! the persona profile, the full session snapshot, and the device's stable
//! session id. Reads treat missing or corrupt values as absent.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use selves_core::{
    Persona, PersonaProfile, PersonaRecord, SelvesError, SessionSnapshot, SnapshotStore,
    StorageAdapter,
};

/// Key holding the persona-definition object.
pub const PROFILE_KEY: &str = "temporalSelves";
/// Key holding the full session snapshot.
pub const SNAPSHOT_KEY: &str = "temporalSelvesWithChat";
/// Key holding the per-device session id.
pub const SESSION_ID_KEY: &str = "sessionId";

/// Profile, session id, and snapshot persistence.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn StorageAdapter>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn StorageAdapter> {
        &self.storage
    }

    /// Stable per-device session id, generated (UUID v4) and stored on first use.
    pub async fn session_id(&self) -> Result<String, SelvesError> {
        if let Some(id) = self.storage.get_item(SESSION_ID_KEY).await?
            && !id.trim().is_empty()
        {
            return Ok(id);
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.storage.set_item(SESSION_ID_KEY, &id).await?;
        debug!(session_id = %id, "generated session id");
        Ok(id)
    }

    /// The stored persona profile, if one is present and readable.
    pub async fn load_profile(&self) -> Option<PersonaProfile> {
        self.read_json(PROFILE_KEY).await
    }

    pub async fn save_profile(&self, profile: &PersonaProfile) -> Result<(), SelvesError> {
        self.write_json(PROFILE_KEY, profile).await
    }

    /// Validates both personas and stores them as the current profile.
    ///
    /// Nothing is written when a required field is missing.
    pub async fn confirm_personas(
        &self,
        past_self: PersonaRecord,
        future_self: PersonaRecord,
    ) -> Result<PersonaProfile, SelvesError> {
        past_self.validate(Persona::Past)?;
        future_self.validate(Persona::Future)?;

        let profile = PersonaProfile {
            session_id: self.session_id().await?,
            created_at: Utc::now(),
            past_self,
            future_self,
        };
        self.save_profile(&profile).await?;
        debug!(session_id = %profile.session_id, "personas confirmed");
        Ok(profile)
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get_item(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "stored value unreadable, treating as absent");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "stored value corrupt, treating as absent");
                None
            }
        }
    }

    async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), SelvesError> {
        let json = serde_json::to_string(value).map_err(|e| SelvesError::Storage {
            source: Box::new(e),
        })?;
        self.storage.set_item(key, &json).await
    }
}

#[async_trait]
impl SnapshotStore for SessionStore {
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SelvesError> {
        self.write_json(SNAPSHOT_KEY, snapshot).await
    }

    async fn load(&self) -> Option<SessionSnapshot> {
        self.read_json(SNAPSHOT_KEY).await
    }
}
