// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations (refinery).

use selves_core::SelvesError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Applies every pending migration.
///
/// Refinery records applied versions in `refinery_schema_history`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), refinery::Error> {
    embedded::migrations::runner().run(conn)?;
    Ok(())
}

pub(crate) fn map_migration_err(e: tokio_rusqlite::Error<refinery::Error>) -> SelvesError {
    SelvesError::Storage {
        source: format!("migration failed: {e}").into(),
    }
}
