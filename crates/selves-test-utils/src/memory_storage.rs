// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `StorageAdapter` with switchable write failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use selves_core::traits::adapter::PluginAdapter;
use selves_core::traits::storage::StorageAdapter;
use selves_core::types::{AdapterType, HealthStatus};
use selves_core::SelvesError;

#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, `set_item` returns a storage error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw value under `key`, bypassing the trait.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.items.lock().await.get(key).cloned()
    }

    fn check_writable(&self) -> Result<(), SelvesError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SelvesError::Storage {
                source: "simulated write failure".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, SelvesError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, SelvesError> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), SelvesError> {
        self.check_writable()?;
        self.items
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn close(&self) -> Result<(), SelvesError> {
        Ok(())
    }
}
