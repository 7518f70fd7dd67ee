// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! The engine talks to the model backend and to durable storage only through
//! these traits, so tests can swap in mocks.

pub mod adapter;
pub mod gateway;
pub mod snapshot;
pub mod storage;

pub use adapter::PluginAdapter;
pub use gateway::BackendGateway;
pub use snapshot::SnapshotStore;
pub use storage::StorageAdapter;
