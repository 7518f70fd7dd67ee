// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Snapshot persistence contract used by the conversation engine.

use async_trait::async_trait;

use crate::error::SelvesError;
use crate::types::SessionSnapshot;

/// Saves and restores complete session snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persists the full snapshot, replacing whatever was stored before.
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SelvesError>;

    /// Returns the stored snapshot, or `None` when nothing usable is stored.
    ///
    /// Unreadable or corrupt values count as "nothing stored".
    async fn load(&self) -> Option<SessionSnapshot>;
}
