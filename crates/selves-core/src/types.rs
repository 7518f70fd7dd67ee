// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data model shared by every Selves crate.
//!
//! JSON field names follow the stored session format (camelCase, `ts` for
//! message timestamps) so snapshots written by earlier clients still load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use crate::error::SelvesError;

/// Content of the transient message marking a reply as pending.
pub const PLACEHOLDER: &str = "…";

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// One of the two fixed conversational identities.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Persona {
    Past,
    Future,
}

impl Persona {
    /// Both personas, past first.
    pub const ALL: [Persona; 2] = [Persona::Past, Persona::Future];
}

/// Author of a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// User-supplied attributes of one persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaRecord {
    pub name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_age",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<u32>,
    pub short_bio: String,
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl PersonaRecord {
    /// Creates a record from the two required fields.
    pub fn new(name: impl Into<String>, short_bio: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: None,
            short_bio: short_bio.into(),
            description: None,
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Sets the description; blank text leaves it unset.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.trim().is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    /// The description if present and not blank.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Checks that `name` and `shortBio` are present.
    pub fn validate(&self, persona: Persona) -> Result<(), SelvesError> {
        if self.name.trim().is_empty() {
            return Err(SelvesError::MissingField {
                persona,
                field: "name",
            });
        }
        if self.short_bio.trim().is_empty() {
            return Err(SelvesError::MissingField {
                persona,
                field: "shortBio",
            });
        }
        Ok(())
    }
}

/// Reads `age` leniently: anything that is not a whole number in `u32`
/// range (negative, fractional, non-numeric text, `""`, `null`) is `None`.
fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAge {
        Unsigned(u64),
        Float(f64),
        Text(String),
        #[allow(dead_code)]
        Other(serde::de::IgnoredAny),
    }

    let age = match Option::<RawAge>::deserialize(deserializer)? {
        Some(RawAge::Unsigned(n)) => u32::try_from(n).ok(),
        Some(RawAge::Float(f)) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => {
            Some(f as u32)
        }
        Some(RawAge::Text(s)) => s.trim().parse().ok(),
        Some(RawAge::Float(_) | RawAge::Other(_)) | None => None,
    };
    Ok(age)
}

/// Maps blank optional text to `None`.
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text.filter(|t| !t.trim().is_empty()))
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "ts", alias = "timestamp")]
    pub timestamp: i64,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: now_millis(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: now_millis(),
        }
    }

    /// The pending-reply marker.
    pub fn placeholder() -> Self {
        Self::assistant(PLACEHOLDER)
    }

    pub fn is_placeholder(&self) -> bool {
        self.role == Role::Assistant && self.content == PLACEHOLDER
    }
}

/// Ordered, chronological message history of one persona.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationLog(Vec<Message>);

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and returns its index.
    pub fn push(&mut self, message: Message) -> usize {
        self.0.push(message);
        self.0.len() - 1
    }

    /// Replaces the message at `index`, returning the previous one.
    ///
    /// Returns `None` (and changes nothing) when `index` is out of range.
    pub fn replace(&mut self, index: usize, message: Message) -> Option<Message> {
        self.0
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, message))
    }

    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.0.iter()
    }

    /// Copy of the log without the message at `index`.
    pub fn without(&self, index: usize) -> ConversationLog {
        ConversationLog(
            self.0
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, m)| m.clone())
                .collect(),
        )
    }
}

impl From<Vec<Message>> for ConversationLog {
    fn from(messages: Vec<Message>) -> Self {
        Self(messages)
    }
}

/// The two persona logs of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLogs {
    #[serde(default)]
    pub past: ConversationLog,
    #[serde(default)]
    pub future: ConversationLog,
}

impl ChatLogs {
    pub fn get(&self, persona: Persona) -> &ConversationLog {
        match persona {
            Persona::Past => &self.past,
            Persona::Future => &self.future,
        }
    }

    pub fn get_mut(&mut self, persona: Persona) -> &mut ConversationLog {
        match persona {
            Persona::Past => &mut self.past,
            Persona::Future => &mut self.future,
        }
    }
}

/// The persona-definition object written once by setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaProfile {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub past_self: PersonaRecord,
    pub future_self: PersonaRecord,
}

impl PersonaProfile {
    pub fn persona(&self, persona: Persona) -> &PersonaRecord {
        match persona {
            Persona::Past => &self.past_self,
            Persona::Future => &self.future_self,
        }
    }

    /// Validates both personas' required fields.
    pub fn validate(&self) -> Result<(), SelvesError> {
        self.past_self.validate(Persona::Past)?;
        self.future_self.validate(Persona::Future)
    }
}

/// Complete persisted state of a session: personas plus both logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub past_self: PersonaRecord,
    pub future_self: PersonaRecord,
    #[serde(default)]
    pub chat: ChatLogs,
    pub updated_at: DateTime<Utc>,
}

impl SessionSnapshot {
    /// Builds a snapshot of `profile` with the given logs, stamped now.
    pub fn new(profile: &PersonaProfile, chat: ChatLogs) -> Self {
        Self {
            session_id: profile.session_id.clone(),
            created_at: profile.created_at,
            past_self: profile.past_self.clone(),
            future_self: profile.future_self.clone(),
            chat,
            updated_at: Utc::now(),
        }
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is reachable but reporting problems.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Kind of adapter, used in status output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Gateway,
    Storage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_round_trips_through_text() {
        use std::str::FromStr;
        for persona in Persona::ALL {
            let parsed = Persona::from_str(&persona.to_string()).unwrap();
            assert_eq!(parsed, persona);
        }
        assert_eq!(Persona::Past.to_string(), "past");
    }

    #[test]
    fn age_accepts_number_blank_and_null() {
        let with_number: PersonaRecord =
            serde_json::from_str(r#"{"name":"Ana","age":17,"shortBio":"student"}"#).unwrap();
        assert_eq!(with_number.age, Some(17));

        let with_blank: PersonaRecord =
            serde_json::from_str(r#"{"name":"Ana","age":"","shortBio":"student"}"#).unwrap();
        assert_eq!(with_blank.age, None);

        let with_null: PersonaRecord =
            serde_json::from_str(r#"{"name":"Ana","age":null,"shortBio":"student"}"#).unwrap();
        assert_eq!(with_null.age, None);

        let with_text: PersonaRecord =
            serde_json::from_str(r#"{"name":"Ana","age":" 40 ","shortBio":"student"}"#).unwrap();
        assert_eq!(with_text.age, Some(40));
    }

    #[test]
    fn out_of_range_age_reads_as_absent() {
        for age in ["-1", "25.5", "4294967296", "\"forty\"", "true", "[1]"] {
            let raw = format!(r#"{{"name":"Ana","age":{age},"shortBio":"student"}}"#);
            let record: PersonaRecord = serde_json::from_str(&raw)
                .unwrap_or_else(|e| panic!("age {age} should not fail the record: {e}"));
            assert_eq!(record.age, None, "age {age}");
            assert_eq!(record.name, "Ana");
        }

        let whole_float: PersonaRecord =
            serde_json::from_str(r#"{"name":"Ana","age":30.0,"shortBio":"student"}"#).unwrap();
        assert_eq!(whole_float.age, Some(30));
    }

    #[test]
    fn blank_description_reads_as_absent() {
        let record: PersonaRecord =
            serde_json::from_str(r#"{"name":"Ana","shortBio":"b","description":"  "}"#).unwrap();
        assert_eq!(record.description, None);
        assert_eq!(record.description(), None);

        let built = PersonaRecord::new("Ana", "b").with_description("");
        assert_eq!(built.description, None);
    }

    #[test]
    fn validate_reports_missing_required_fields() {
        let ok = PersonaRecord::new("Ana", "student");
        assert!(ok.validate(Persona::Past).is_ok());

        let no_name = PersonaRecord::new("  ", "student");
        match no_name.validate(Persona::Past) {
            Err(SelvesError::MissingField { persona, field }) => {
                assert_eq!(persona, Persona::Past);
                assert_eq!(field, "name");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }

        let no_bio = PersonaRecord::new("Ana", "");
        assert!(matches!(
            no_bio.validate(Persona::Future),
            Err(SelvesError::MissingField { field: "shortBio", .. })
        ));
    }

    #[test]
    fn message_timestamp_uses_ts_key() {
        let msg = Message {
            role: Role::User,
            content: "hi".into(),
            timestamp: 42,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["ts"], 42);
        assert_eq!(json["role"], "user");

        let aliased: Message =
            serde_json::from_str(r#"{"role":"assistant","content":"x","timestamp":7}"#).unwrap();
        assert_eq!(aliased.timestamp, 7);
    }

    #[test]
    fn placeholder_detection() {
        assert!(Message::placeholder().is_placeholder());
        assert!(!Message::user(PLACEHOLDER).is_placeholder());
        assert!(!Message::assistant("hello").is_placeholder());
    }

    #[test]
    fn log_replace_keeps_length() {
        let mut log = ConversationLog::new();
        log.push(Message::user("hi"));
        let slot = log.push(Message::placeholder());
        assert_eq!(slot, 1);

        let old = log.replace(slot, Message::assistant("hello")).unwrap();
        assert!(old.is_placeholder());
        assert_eq!(log.len(), 2);
        assert_eq!(log.last().unwrap().content, "hello");

        assert!(log.replace(9, Message::assistant("nope")).is_none());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn log_without_drops_only_that_index() {
        let log = ConversationLog::from(vec![
            Message::user("a"),
            Message::placeholder(),
            Message::user("c"),
        ]);
        let trimmed = log.without(1);
        let contents: Vec<_> = trimmed.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "c"]);
    }

    #[test]
    fn snapshot_reads_stored_format() {
        let raw = r#"{
            "sessionId": "abc",
            "createdAt": "2025-03-01T10:00:00.000Z",
            "pastSelf": {"name": "Young Me", "age": "", "shortBio": "15, anxious"},
            "futureSelf": {"name": "Older Me", "shortBio": "calm", "description": "lives by the sea"},
            "chat": {
                "past": [{"role": "assistant", "content": "Hi", "ts": 1}],
                "future": []
            },
            "updatedAt": "2025-03-01T10:05:00.000Z"
        }"#;
        let snapshot: SessionSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.session_id, "abc");
        assert_eq!(snapshot.past_self.age, None);
        assert_eq!(snapshot.future_self.description(), Some("lives by the sea"));
        assert_eq!(snapshot.chat.get(Persona::Past).len(), 1);
        assert!(snapshot.chat.get(Persona::Future).is_empty());
    }

    #[test]
    fn snapshot_without_chat_defaults_to_empty_logs() {
        let raw = r#"{
            "sessionId": "abc",
            "createdAt": "2025-03-01T10:00:00Z",
            "pastSelf": {"name": "A", "shortBio": "b"},
            "futureSelf": {"name": "C", "shortBio": "d"},
            "updatedAt": "2025-03-01T10:00:00Z"
        }"#;
        let snapshot: SessionSnapshot = serde_json::from_str(raw).unwrap();
        assert!(snapshot.chat.past.is_empty());
        assert!(snapshot.chat.future.is_empty());
    }

    #[test]
    fn health_status_variants() {
        assert_eq!(HealthStatus::Healthy, HealthStatus::Healthy);
        assert_ne!(HealthStatus::Degraded("slow".into()), HealthStatus::Healthy);
        assert_eq!(AdapterType::Gateway.to_string(), "Gateway");
    }

    proptest::proptest! {
        #[test]
        fn replace_never_changes_length(len in 1usize..20, index in 0usize..30) {
            let mut log = ConversationLog::from(
                (0..len).map(|i| Message::user(format!("m{i}"))).collect::<Vec<_>>(),
            );
            log.replace(index, Message::assistant("r"));
            proptest::prop_assert_eq!(log.len(), len);
        }
    }
}
