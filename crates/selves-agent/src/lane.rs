// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-persona conversation state.
//!
//! A lane is one persona's log plus the index of its pending placeholder,
//! if an exchange is in flight.

use selves_core::{ChatLogs, ConversationLog, Message, Persona, SelvesError};

/// Shown in place of a reply whose exchange was abandoned.
pub const INTERRUPTED_NOTICE: &str = "(no reply: the request was interrupted)";

/// One persona's log and single-flight marker.
#[derive(Debug, Clone, Default)]
pub struct Lane {
    log: ConversationLog,
    pending: Option<usize>,
}

/// A send accepted by [`Lane::begin`].
#[derive(Debug)]
pub struct Ticket {
    /// Index of the placeholder to replace.
    pub slot: usize,
    /// The log as it stood before this send.
    pub history: Vec<Message>,
}

impl Lane {
    pub fn new(log: ConversationLog) -> Self {
        Self { log, pending: None }
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Appends the user message and a placeholder, marking the lane busy.
    ///
    /// `text` must already be trimmed and non-empty.
    pub fn begin(&mut self, persona: Persona, text: &str) -> Result<Ticket, SelvesError> {
        if self.pending.is_some() {
            return Err(SelvesError::SendInFlight { persona });
        }
        let history = self.log.messages().to_vec();
        self.log.push(Message::user(text));
        let slot = self.log.push(Message::placeholder());
        self.pending = Some(slot);
        Ok(Ticket { slot, history })
    }

    /// Replaces the placeholder at `slot` and frees the lane.
    ///
    /// Returns false if `slot` is not this lane's pending placeholder.
    pub fn resolve(&mut self, slot: usize, reply: Message) -> bool {
        if self.pending != Some(slot) {
            return false;
        }
        self.pending = None;
        self.log.replace(slot, reply).is_some()
    }

    /// The log without an in-flight placeholder.
    pub fn settled_log(&self) -> ConversationLog {
        match self.pending {
            Some(slot) => self.log.without(slot),
            None => self.log.clone(),
        }
    }
}

/// Both lanes, addressed by persona.
#[derive(Debug, Clone, Default)]
pub struct Lanes {
    past: Lane,
    future: Lane,
}

impl Lanes {
    pub fn new(past: Lane, future: Lane) -> Self {
        Self { past, future }
    }

    pub fn get(&self, persona: Persona) -> &Lane {
        match persona {
            Persona::Past => &self.past,
            Persona::Future => &self.future,
        }
    }

    pub fn get_mut(&mut self, persona: Persona) -> &mut Lane {
        match persona {
            Persona::Past => &mut self.past,
            Persona::Future => &mut self.future,
        }
    }

    /// Both logs with in-flight placeholders left out.
    pub fn settled(&self) -> ChatLogs {
        ChatLogs {
            past: self.past.settled_log(),
            future: self.future.settled_log(),
        }
    }
}
