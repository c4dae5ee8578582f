use studytrack_core::db::migrations::{current_user_version, latest_version};
use studytrack_core::db::{open_db, open_db_in_memory, DbError};
use studytrack_core::{
    AppConfig, AuthService, ExerciseStatus, KeyValueStore, SqliteKeyValueStore, StudyStore,
};

#[test]
fn fresh_database_is_migrated_to_latest() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());

    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries'
            );",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    {
        let conn = open_db(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
            .unwrap();
    }
    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::UnsupportedSchemaVersion { .. }));
}

#[test]
fn kv_set_overwrites_and_remove_deletes() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);

    assert_eq!(store.get("k").unwrap(), None);
    store.set("k", "one").unwrap();
    store.set("k", "two").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));

    store.remove("k").unwrap();
    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn keys_with_prefix_lists_identity_slots() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);
    store.set("study-tracker-progress-b@x.io", "{}").unwrap();
    store.set("study-tracker-progress-a@x.io", "{}").unwrap();
    store.set("study-tracker-auth", "{}").unwrap();

    let keys = store.keys_with_prefix("study-tracker-progress-").unwrap();
    assert_eq!(
        keys,
        vec![
            "study-tracker-progress-a@x.io".to_string(),
            "study-tracker-progress-b@x.io".to_string()
        ]
    );
}

#[test]
fn study_state_and_session_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("study.sqlite3");
    let config = AppConfig::default();

    let topic_id = {
        let conn = open_db(&path).unwrap();
        let storage = SqliteKeyValueStore::new(&conn);
        let mut auth = AuthService::new(&storage, &config);
        auth.login("student@example.com", "secret").unwrap();

        let mut store = StudyStore::open(&storage, &config, &auth);
        let topic_id = store.add_topic("Persistence", "", 2);
        let exercise_id = store.topic(&topic_id).unwrap().exercises[1].id.clone();
        store.update_exercise_status(&topic_id, &exercise_id, ExerciseStatus::InProgress);
        store.update_topic_note(&topic_id, "write-through");
        topic_id
    };

    let conn = open_db(&path).unwrap();
    let storage = SqliteKeyValueStore::new(&conn);
    let auth = AuthService::new(&storage, &config);
    assert!(auth.is_authenticated());

    let store = StudyStore::open(&storage, &config, &auth);
    let topic = store.topic(&topic_id).unwrap();
    assert_eq!(topic.note, "write-through");
    assert_eq!(topic.exercises[1].status, ExerciseStatus::InProgress);
}
