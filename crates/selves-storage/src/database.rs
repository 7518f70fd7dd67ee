// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection setup: PRAGMAs, WAL mode, migrations.
//!
//! Every statement runs on tokio-rusqlite's single background thread, so
//! writes are serialized without extra locking.

use std::path::Path;

use selves_core::SelvesError;
use tracing::debug;

use crate::migrations::{map_migration_err, run_migrations};

/// An open, migrated database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and migrates it.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, SelvesError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| SelvesError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| SelvesError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            }
            conn.execute_batch("PRAGMA synchronous = NORMAL; PRAGMA busy_timeout = 5000;")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(run_migrations)
            .await
            .map_err(map_migration_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}

/// Wraps a tokio-rusqlite failure as a storage error.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> SelvesError {
    SelvesError::Storage {
        source: Box::new(e),
    }
}
