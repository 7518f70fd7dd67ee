// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `StorageAdapter` trait.

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tracing::debug;

use selves_config::model::StorageConfig;
use selves_core::{AdapterType, HealthStatus, PluginAdapter, SelvesError, StorageAdapter};

use crate::database::{Database, map_tr_err};

/// Key/value storage in the `local_store` table.
pub struct SqliteStorage {
    db: Database,
    path: String,
}

impl SqliteStorage {
    /// Opens and migrates the database named in `config`.
    pub async fn open(config: &StorageConfig) -> Result<Self, SelvesError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite storage initialized");
        Ok(Self {
            db,
            path: config.database_path.clone(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, SelvesError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, SelvesError> {
        let key = key.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
                conn.query_row(
                    "SELECT value FROM local_store WHERE key = ?1",
                    rusqlite::params![key],
                    |row| row.get(0),
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), SelvesError> {
        let key = key.to_string();
        let value = value.to_string();
        let updated_at = chrono::Utc::now().to_rfc3339();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO local_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value, \
                     updated_at = excluded.updated_at",
                    rusqlite::params![key, value, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn close(&self) -> Result<(), SelvesError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
