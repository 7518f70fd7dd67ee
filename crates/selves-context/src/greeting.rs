// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use selves_core::{Persona, PersonaRecord};

/// Opening line seeded into a fresh log for `role`.
pub fn greeting(persona: &PersonaRecord, role: Persona) -> String {
    format!(
        "Hi — I’m your {role} self “{}”.\nWhat’s on your mind right now?",
        persona.name.trim()
    )
}
