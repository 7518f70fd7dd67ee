// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state for the past and future personas.
//!
//! [`ConversationEngine`] owns both logs, enforces one exchange in flight per
//! persona, and persists the full session after every resolved exchange.

pub mod engine;
pub mod lane;

pub use engine::ConversationEngine;
pub use lane::{INTERRUPTED_NOTICE, Lane, Lanes, Ticket};
