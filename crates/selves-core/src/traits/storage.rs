// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait: a device-local string key/value store.

use async_trait::async_trait;

use crate::error::SelvesError;
use crate::traits::adapter::PluginAdapter;

/// Device-local key/value storage, shaped like browser local storage.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Reads the value stored under `key`.
    async fn get_item(&self, key: &str) -> Result<Option<String>, SelvesError>;

    /// Stores `value` under `key`, overwriting any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), SelvesError>;

    /// Flushes pending writes and releases the backend.
    async fn close(&self) -> Result<(), SelvesError>;
}
