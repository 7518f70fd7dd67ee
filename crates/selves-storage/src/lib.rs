// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device-local persistence for Selves.
//!
//! [`SqliteStorage`] is a small key/value store on a WAL-mode SQLite file.
//! [`SessionStore`] keeps the persona profile, the session id, and the full
//! session snapshot in it.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod session;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use session::{PROFILE_KEY, SESSION_ID_KEY, SNAPSHOT_KEY, SessionStore};
