// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `selves setup` command implementation.
//!
//! Asks for both personas field by field and stores them as the current
//! profile. Re-running setup pre-fills the stored answers and starts a fresh
//! conversation once confirmed.

use std::sync::Arc;

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use selves_config::model::SelvesConfig;
use selves_core::{Persona, PersonaRecord, SelvesError, StorageAdapter};
use selves_storage::{SessionStore, SqliteStorage};
use tracing::info;

/// Runs the `selves setup` prompts.
pub async fn run_setup(config: &SelvesConfig) -> Result<(), SelvesError> {
    let storage = Arc::new(SqliteStorage::open(&config.storage).await?);
    let sessions = SessionStore::new(storage.clone() as Arc<dyn StorageAdapter>);
    let existing = sessions.load_profile().await;

    let mut rl = DefaultEditor::new()
        .map_err(|e| SelvesError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "selves setup".bold().green());
    println!(
        "Describe who you were and who you hope to become. {} and {} are required.\n",
        "name".yellow(),
        "short bio".yellow()
    );

    let mut ask_for = |persona: Persona| {
        println!("{}", format!("Your {persona} self").bold());
        let record = ask_persona(&mut rl, existing.as_ref().map(|p| p.persona(persona)));
        println!();
        record
    };
    let past = ask_for(Persona::Past)?;
    let future = ask_for(Persona::Future)?;

    let profile = sessions.confirm_personas(past, future).await?;
    info!(session_id = %profile.session_id, "profile saved");
    storage.close().await?;

    println!(
        "Saved {} and {}. Run {} to start talking.",
        profile.past_self.name.cyan(),
        profile.future_self.name.magenta(),
        "selves chat".yellow()
    );
    Ok(())
}

fn ask_persona(
    rl: &mut DefaultEditor,
    previous: Option<&PersonaRecord>,
) -> Result<PersonaRecord, SelvesError> {
    let name = ask_required(rl, "  Name: ", previous.map(|p| p.name.as_str()))?;

    let previous_age = previous.and_then(|p| p.age).map(|a| a.to_string());
    let age = loop {
        let input = ask(rl, "  Age (optional): ", previous_age.as_deref())?;
        match parse_age(&input) {
            Ok(age) => break age,
            Err(message) => eprintln!("  {}", message.yellow()),
        }
    };

    let short_bio = ask_required(rl, "  Short bio: ", previous.map(|p| p.short_bio.as_str()))?;
    let description = ask(
        rl,
        "  Description (optional): ",
        previous.and_then(|p| p.description()),
    )?;

    let mut record = PersonaRecord::new(name, short_bio).with_description(description);
    record.age = age;
    Ok(record)
}

fn ask_required(
    rl: &mut DefaultEditor,
    prompt: &str,
    initial: Option<&str>,
) -> Result<String, SelvesError> {
    loop {
        let input = ask(rl, prompt, initial)?;
        if !input.is_empty() {
            return Ok(input);
        }
        eprintln!("  {}", "This field is required.".yellow());
    }
}

fn ask(rl: &mut DefaultEditor, prompt: &str, initial: Option<&str>) -> Result<String, SelvesError> {
    let line = match initial {
        Some(initial) => rl.readline_with_initial(prompt, (initial, "")),
        None => rl.readline(prompt),
    };
    match line {
        Ok(line) => Ok(line.trim().to_string()),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
            Err(SelvesError::Internal("setup cancelled".into()))
        }
        Err(e) => Err(SelvesError::Internal(format!("failed to read input: {e}"))),
    }
}

/// Parses the optional age answer: blank means unset.
pub fn parse_age(input: &str) -> Result<Option<u32>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse::<u32>()
        .map(Some)
        .map_err(|_| format!("`{input}` is not a whole number; leave it blank to skip."))
}
