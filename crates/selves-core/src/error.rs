// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Selves conversation engine.

use thiserror::Error;

use crate::types::Persona;

/// The primary error type used across all Selves crates.
///
/// Backend failures never show up here: the gateway folds them into chat
/// text. What remains are input rejections, storage faults, and setup
/// problems.
#[derive(Debug, Error)]
pub enum SelvesError {
    /// Configuration errors (invalid values, unusable endpoint).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database open, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Gateway setup or health probe errors.
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The message text was empty after trimming.
    #[error("message is empty")]
    EmptyMessage,

    /// An exchange is already pending for this persona.
    #[error("a reply from the {persona} self is still pending")]
    SendInFlight { persona: Persona },

    /// A required persona attribute is missing.
    #[error("{persona} self is missing required field `{field}`")]
    MissingField {
        persona: Persona,
        field: &'static str,
    },

    /// No persona profile has been set up yet.
    #[error("no personas defined yet, run `selves setup` first")]
    NoProfile,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SelvesError {
    /// Returns true for input rejections that leave every log untouched.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SelvesError::EmptyMessage
                | SelvesError::SendInFlight { .. }
                | SelvesError::MissingField { .. }
                | SelvesError::NoProfile
        )
    }
}
