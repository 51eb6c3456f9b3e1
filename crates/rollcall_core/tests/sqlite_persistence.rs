use rollcall_core::db::migrations::latest_version;
use rollcall_core::db::{open_db, open_db_in_memory};
use rollcall_core::{
    AttendanceStatus, AttendanceTracker, ConfirmPrompt, DateKey, KeyValueStore, Mark,
    SqliteKeyValueStore, StoreError, ATTENDANCE_KEY, STUDENTS_KEY,
};
use rusqlite::Connection;

fn yes(_: &ConfirmPrompt) -> bool {
    true
}

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries');",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        StoreError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn tracker_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rollcall.sqlite3");

    let id = {
        let conn = open_db(&path).unwrap();
        let mut tracker = AttendanceTracker::load(SqliteKeyValueStore::new(&conn)).unwrap();
        let id = tracker.add_student("Alice", "001", yes).unwrap().applied().unwrap().id;
        tracker.set_status("2024-01-01", &id, Mark::Present).unwrap();
        id
    };

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let tracker = AttendanceTracker::load(SqliteKeyValueStore::new(&conn)).unwrap();
    assert_eq!(tracker.roster().len(), 1);
    assert_eq!(
        tracker.status(&DateKey::parse("2024-01-01").unwrap(), &id),
        AttendanceStatus::Present
    );
}

#[test]
fn legacy_boolean_records_load_from_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);
    store
        .set(STUDENTS_KEY, r#"[{"id":"s_1700000000000","name":"Legacy"}]"#)
        .unwrap();
    store
        .set(ATTENDANCE_KEY, r#"{"2023-09-01":{"s_1700000000000":false}}"#)
        .unwrap();

    let tracker = AttendanceTracker::load(&store).unwrap();
    let legacy = &tracker.roster().students()[0];
    assert_eq!(legacy.roll, "");
    assert_eq!(
        tracker.status(&DateKey::parse("2023-09-01").unwrap(), &legacy.id),
        AttendanceStatus::Absent
    );
    assert_eq!(tracker.percent_for(&legacy.id).to_string(), "0%");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
