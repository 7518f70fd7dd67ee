// SPDX-FileCopyrightText: 2026 Selves Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store behaviour on a real SQLite file.

use std::sync::Arc;

use selves_config::model::StorageConfig;
use selves_core::{
    ChatLogs, Message, Persona, PersonaRecord, SelvesError, SessionSnapshot, SnapshotStore,
    StorageAdapter,
};
use selves_storage::{PROFILE_KEY, SNAPSHOT_KEY, SessionStore, SqliteStorage};
use tempfile::TempDir;

async fn open(dir: &TempDir) -> (Arc<SqliteStorage>, SessionStore) {
    let config = StorageConfig {
        database_path: dir.path().join("selves.db").to_string_lossy().into_owned(),
        wal_mode: true,
    };
    let storage = Arc::new(SqliteStorage::open(&config).await.expect("open storage"));
    let store = SessionStore::new(storage.clone());
    (storage, store)
}

fn past() -> PersonaRecord {
    PersonaRecord::new("Mara", "first-year student").with_age(19)
}

fn future() -> PersonaRecord {
    PersonaRecord::new("Dr. Mara", "design lead").with_description("calm, settled")
}

#[tokio::test]
async fn fresh_store_has_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (_, store) = open(&dir).await;
    assert!(store.load().await.is_none());
    assert!(store.load_profile().await.is_none());
}

#[tokio::test]
async fn snapshot_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let (_, store) = open(&dir).await;
    let profile = store.confirm_personas(past(), future()).await.unwrap();

    let mut chat = ChatLogs::default();
    chat.past.push(Message::assistant("Hi — I’m your past self “Mara”."));
    chat.past.push(Message::user("I miss sketching"));
    chat.past.push(Message::assistant("Then pick up a pencil tonight?"));
    chat.future.push(Message::assistant("Hello from later"));
    let snapshot = SessionSnapshot::new(&profile, chat);

    store.save(&snapshot).await.unwrap();
    let loaded = store.load().await.expect("snapshot stored");

    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.past_self, profile.past_self);
    assert_eq!(loaded.chat.get(Persona::Past).len(), 3);
}

#[tokio::test]
async fn save_overwrites_whole_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let (_, store) = open(&dir).await;
    let profile = store.confirm_personas(past(), future()).await.unwrap();

    let mut long = ChatLogs::default();
    for i in 0..5 {
        long.future.push(Message::user(format!("m{i}")));
    }
    store.save(&SessionSnapshot::new(&profile, long)).await.unwrap();

    let mut short = ChatLogs::default();
    short.future.push(Message::user("only"));
    store.save(&SessionSnapshot::new(&profile, short)).await.unwrap();

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.chat.future.len(), 1);
    assert!(loaded.chat.past.is_empty());
}

#[tokio::test]
async fn confirm_rejects_missing_fields_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let (storage, store) = open(&dir).await;

    let err = store
        .confirm_personas(past(), PersonaRecord::new("Later me", "  "))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SelvesError::MissingField {
            persona: Persona::Future,
            field: "shortBio"
        }
    ));
    assert!(storage.get_item(PROFILE_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn confirm_reuses_session_id() {
    let dir = tempfile::tempdir().unwrap();
    let (_, store) = open(&dir).await;
    let first = store.confirm_personas(past(), future()).await.unwrap();
    let second = store.confirm_personas(future(), past()).await.unwrap();
    assert_eq!(first.session_id, second.session_id);
    assert_eq!(store.load_profile().await.unwrap(), second);
}

#[tokio::test]
async fn reads_snapshot_written_by_browser_client() {
    let dir = tempfile::tempdir().unwrap();
    let (storage, store) = open(&dir).await;
    let raw = r#"{
        "sessionId": "6f1c",
        "createdAt": "2026-01-05T10:00:00.000Z",
        "pastSelf": {"name": "Ana", "age": "", "shortBio": "kid"},
        "futureSelf": {"name": "Ana", "age": 60, "shortBio": "grandma", "description": ""},
        "chat": {
            "past": [{"role": "assistant", "content": "hey", "ts": 1736071200000}],
            "future": []
        },
        "updatedAt": "2026-01-05T10:05:00.000Z"
    }"#;
    storage.set_item(SNAPSHOT_KEY, raw).await.unwrap();

    let loaded = store.load().await.expect("browser snapshot should parse");
    assert_eq!(loaded.session_id, "6f1c");
    assert_eq!(loaded.past_self.age, None);
    assert_eq!(loaded.future_self.age, Some(60));
    assert_eq!(loaded.future_self.description, None);
    assert_eq!(loaded.chat.past.messages()[0].timestamp, 1_736_071_200_000);
}

#[tokio::test]
async fn snapshot_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = {
        let (storage, store) = open(&dir).await;
        let profile = store.confirm_personas(past(), future()).await.unwrap();
        let mut chat = ChatLogs::default();
        chat.past.push(Message::user("still here?"));
        let snapshot = SessionSnapshot::new(&profile, chat);
        store.save(&snapshot).await.unwrap();
        storage.close().await.unwrap();
        snapshot
    };

    let (_, store) = open(&dir).await;
    assert_eq!(store.load().await, Some(snapshot));
}

#[tokio::test]
async fn unusable_age_keeps_profile_and_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let (storage, store) = open(&dir).await;
    let profile = r#"{
        "sessionId": "9a2e",
        "createdAt": "2026-02-10T08:00:00.000Z",
        "pastSelf": {"name": "Ana", "age": -1, "shortBio": "kid"},
        "futureSelf": {"name": "Ana", "age": 25.5, "shortBio": "grown up"}
    }"#;
    let snapshot = r#"{
        "sessionId": "9a2e",
        "createdAt": "2026-02-10T08:00:00.000Z",
        "pastSelf": {"name": "Ana", "age": -1, "shortBio": "kid"},
        "futureSelf": {"name": "Ana", "age": 25.5, "shortBio": "grown up"},
        "chat": {
            "past": [
                {"role": "assistant", "content": "hey", "ts": 1},
                {"role": "user", "content": "remember the lake?", "ts": 2}
            ],
            "future": []
        },
        "updatedAt": "2026-02-10T08:05:00.000Z"
    }"#;
    storage.set_item(PROFILE_KEY, profile).await.unwrap();
    storage.set_item(SNAPSHOT_KEY, snapshot).await.unwrap();

    let loaded_profile = store.load_profile().await.expect("profile should survive a bad age");
    assert_eq!(loaded_profile.past_self.age, None);
    assert_eq!(loaded_profile.future_self.age, None);

    let loaded = store.load().await.expect("transcript should survive a bad age");
    assert_eq!(loaded.chat.past.len(), 2);
    assert_eq!(loaded.chat.past.messages()[1].content, "remember the lake?");
}
