// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Selves dual-persona conversation engine.
//!
//! Holds the data model (personas, messages, logs, snapshots), the shared
//! error type, and the adapter traits the engine is written against.

pub mod error;
pub mod traits;
pub mod types;

pub use error::SelvesError;
pub use types::{
    AdapterType, ChatLogs, ConversationLog, HealthStatus, Message, PLACEHOLDER, Persona,
    PersonaProfile, PersonaRecord, Role, SessionSnapshot,
};

pub use traits::{BackendGateway, PluginAdapter, SnapshotStore, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_classified() {
        assert!(SelvesError::EmptyMessage.is_input_error());
        assert!(
            SelvesError::SendInFlight {
                persona: Persona::Past
            }
            .is_input_error()
        );
        assert!(SelvesError::NoProfile.is_input_error());
        assert!(!SelvesError::Internal("x".into()).is_input_error());
        assert!(
            !SelvesError::Storage {
                source: Box::new(std::io::Error::other("disk"))
            }
            .is_input_error()
        );
    }

    #[test]
    fn error_messages_name_the_persona() {
        let err = SelvesError::SendInFlight {
            persona: Persona::Future,
        };
        assert_eq!(err.to_string(), "a reply from the future self is still pending");

        let err = SelvesError::MissingField {
            persona: Persona::Past,
            field: "name",
        };
        assert_eq!(err.to_string(), "past self is missing required field `name`");
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_gateway<T: BackendGateway>() {}
        fn _assert_storage<T: StorageAdapter>() {}
        fn _assert_snapshot<T: SnapshotStore>() {}
        fn _assert_plugin<T: PluginAdapter>() {}
    }
}
