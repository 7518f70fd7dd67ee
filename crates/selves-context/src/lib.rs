// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly for the two personas.
//!
//! Everything here is pure: the same persona record always produces the same
//! system prompt and the same greeting.

pub mod greeting;
pub mod prompt;

pub use greeting::greeting;
pub use prompt::{NOT_SPECIFIED, SAFEGUARD_RULES, build_system_prompt};
