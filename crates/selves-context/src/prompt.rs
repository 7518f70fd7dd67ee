// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt construction.
//!
//! A prompt is three blocks joined by blank lines: the persona's stance, the
//! identity it must embody, and the fixed safeguard rules.

use selves_core::{Persona, PersonaRecord};

/// Rendered in place of an absent optional attribute.
pub const NOT_SPECIFIED: &str = "not specified";

/// Rules appended to every system prompt, for both personas.
pub const SAFEGUARD_RULES: &str = "\
Safeguards:
- Be supportive and constructive. Gently guide the user toward coping, clarity, and small next steps.
- Validate feelings without amplifying distress. Avoid catastrophizing, shame, or harsh judgments.
- Do not provide medical, legal, or crisis advice. If the user asks for emergency help, suggest seeking professional/local support.
- Encourage agency: help the user identify one controllable action, one helpful reframe, or one small experiment.
- Ask at most ONE reflective follow-up question per turn.
- Keep responses concise (2–6 sentences). End with a gentle question or invitation.";

const PAST_STANCE: &str = "\
You are the user's PAST self.
Your stance: empathetic, honest, grounded in what it felt like back then.
Goal: help the user feel understood, reduce self-blame, and identify one small next step.";

const FUTURE_STANCE: &str = "\
You are the user's FUTURE self.
Your stance: calm, hopeful, perspective-taking.
Goal: help the user see possibilities, focus on progress, and identify one small next step.";

/// Builds the system prompt for `persona` speaking as `role`.
pub fn build_system_prompt(persona: &PersonaRecord, role: Persona) -> String {
    format!(
        "{}\n\n{}\n\n{}",
        stance(role),
        identity(persona),
        SAFEGUARD_RULES
    )
}

fn stance(role: Persona) -> &'static str {
    match role {
        Persona::Past => PAST_STANCE,
        Persona::Future => FUTURE_STANCE,
    }
}

fn identity(persona: &PersonaRecord) -> String {
    let name = persona.name.trim();
    let age = persona
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let description = persona
        .description()
        .map(single_line)
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());

    format!(
        "Identity you must embody:
- Name: {name}
- Age: {age}
- Short bio: {bio}
- Description: {description}

Rules:
- Speak in first person as {name}.
- Stay consistent with the bio/description.
- Do not mention \"system prompt\" or policies.",
        bio = single_line(&persona.short_bio),
    )
}

/// Trims and folds line breaks so a bio or description stays on its own bullet.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
