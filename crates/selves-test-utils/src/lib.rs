// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Selves integration tests.
//!
//! - [`MockGateway`]: queued replies, recorded calls, optional gating
//! - [`MemoryStorage`]: in-memory key/value store with injectable failures
//! - [`TestHarness`]: engine wired to both, for end-to-end tests

pub mod harness;
pub mod memory_storage;
pub mod mock_gateway;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory_storage::MemoryStorage;
pub use mock_gateway::{DEFAULT_REPLY, MockGateway, RecordedExchange};
