// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `selves chat` command implementation.
//!
//! An interactive REPL over both persona lanes. Each send runs as its own
//! task, so the other persona can be addressed while one reply is pending.

use std::sync::Arc;

use colored::{ColoredString, Colorize};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use selves_agent::ConversationEngine;
use selves_config::model::SelvesConfig;
use selves_core::{
    BackendGateway, ConversationLog, Message, Persona, Role, SelvesError, SnapshotStore,
    StorageAdapter,
};
use selves_gateway::ProxyGateway;
use selves_storage::{SessionStore, SqliteStorage};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Plain text for the active persona.
    Say(String),
    /// Make a persona the active one.
    Switch(Persona),
    /// Send the same text to both personas.
    Both(String),
    Show,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

/// Parses one input line.
pub fn parse_command(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return ShellCommand::Say(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "past" if arg.is_empty() => ShellCommand::Switch(Persona::Past),
        "future" if arg.is_empty() => ShellCommand::Switch(Persona::Future),
        "both" if !arg.is_empty() => ShellCommand::Both(arg.to_string()),
        "show" => ShellCommand::Show,
        "help" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        _ => ShellCommand::Unknown(line.to_string()),
    }
}

/// Runs the `selves chat` REPL.
pub async fn run_chat(config: &SelvesConfig) -> Result<(), SelvesError> {
    let storage = Arc::new(SqliteStorage::open(&config.storage).await?);
    let sessions = Arc::new(SessionStore::new(
        storage.clone() as Arc<dyn StorageAdapter>
    ));
    let profile = sessions.load_profile().await.ok_or(SelvesError::NoProfile)?;

    let gateway: Arc<dyn BackendGateway> = Arc::new(ProxyGateway::new(&config.backend)?);
    let store: Arc<dyn SnapshotStore> = sessions;
    let engine = Arc::new(ConversationEngine::start(profile, gateway, store).await?);

    let mut rl = DefaultEditor::new()
        .map_err(|e| SelvesError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", config.app.name.bold().green());
    print_help();
    println!();
    for persona in Persona::ALL {
        print_log(&engine, persona);
    }

    let mut active = Persona::Past;
    let mut in_flight: Vec<JoinHandle<()>> = Vec::new();

    loop {
        in_flight.retain(|task| !task.is_finished());

        let prompt = format!("{}> ", persona_label(&engine, active));
        match rl.readline(&prompt) {
            Ok(line) => {
                let command = parse_command(&line);
                if !matches!(command, ShellCommand::Empty) {
                    let _ = rl.add_history_entry(line.trim());
                }
                match command {
                    ShellCommand::Say(text) => {
                        in_flight.push(spawn_send(engine.clone(), active, text));
                    }
                    ShellCommand::Both(text) => {
                        for persona in Persona::ALL {
                            in_flight.push(spawn_send(engine.clone(), persona, text.clone()));
                        }
                    }
                    ShellCommand::Switch(persona) => {
                        active = persona;
                        if engine.is_pending(persona) {
                            println!("{}", "(still waiting for a reply)".dimmed());
                        }
                    }
                    ShellCommand::Show => {
                        for persona in Persona::ALL {
                            print_log(&engine, persona);
                        }
                    }
                    ShellCommand::Help => print_help(),
                    ShellCommand::Quit => break,
                    ShellCommand::Unknown(input) => {
                        eprintln!("{} {input}, try /help", "unknown command:".yellow());
                    }
                    ShellCommand::Empty => {}
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    if !in_flight.is_empty() {
        println!("{}", "waiting for pending replies...".dimmed());
    }
    for task in in_flight {
        if let Err(e) = task.await {
            warn!(error = %e, "send task ended abnormally");
        }
    }

    storage.close().await?;
    println!("{}", "goodbye".dimmed());
    Ok(())
}

fn spawn_send(engine: Arc<ConversationEngine>, persona: Persona, text: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        match engine.send(persona, &text).await {
            Ok(reply) => {
                println!("\n{}: {reply}", persona_label(&engine, persona));
            }
            Err(e) if e.is_input_error() => {
                debug!(persona = %persona, error = %e, "send rejected");
                eprintln!("\n{}", e.to_string().yellow());
            }
            Err(e) => eprintln!("\n{}: {e}", "error".red()),
        }
    })
}

fn persona_label(engine: &ConversationEngine, persona: Persona) -> ColoredString {
    let name = &engine.profile().persona(persona).name;
    match persona {
        Persona::Past => name.cyan(),
        Persona::Future => name.magenta(),
    }
}

fn print_log(engine: &ConversationEngine, persona: Persona) {
    let label = persona_label(engine, persona);
    println!("{}", format!("--- {persona} self ---").bold());
    print!("{}", render_log(&engine.log(persona), &label.to_string()));
    println!();
}

/// Renders a log one message per line, user lines prefixed with `you`.
pub fn render_log(log: &ConversationLog, persona_name: &str) -> String {
    log.iter()
        .map(|message: &Message| {
            let speaker = match message.role {
                Role::User => "you",
                Role::Assistant => persona_name,
            };
            format!("{speaker}: {}\n", message.content)
        })
        .collect()
}

fn print_help() {
    println!(
        "Type to talk to the active self. {} / {} switch, {} asks both, {} reprints, {} exits.",
        "/past".yellow(),
        "/future".yellow(),
        "/both <text>".yellow(),
        "/show".yellow(),
        "/quit".yellow()
    );
}
