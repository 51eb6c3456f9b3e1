//! Serialized layout of the roster and attendance map.
//!
//! # Responsibility
//! - Decode the two stored JSON values into typed state.
//! - Encode typed state back with the current status encoding.
//!
//! # Invariants
//! - Every stored status is read through `status::normalize`.
//! - Loaded state satisfies the in-memory invariants: no unset entries,
//!   no invalid date keys, no entries for students missing from the roster.
//! - Saving always writes both keys.

use crate::model::attendance::AttendanceBook;
use crate::model::date_key::DateKey;
use crate::model::roster::Roster;
use crate::model::status::normalize;
use crate::model::student::{Student, StudentId};
use crate::repo::kv_store::{KeyValueStore, StoreError, StoreResult};
use log::{info, warn};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Storage key for the serialized student list.
pub const STUDENTS_KEY: &str = "attendance_students_v1";
/// Storage key for the serialized `date -> student -> status` map.
pub const ATTENDANCE_KEY: &str = "attendance_records_v1";

type RawAttendance = BTreeMap<String, Map<String, Value>>;

/// Typed access to tracker state stored in a `KeyValueStore`.
pub struct TrackerRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TrackerRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads roster and attendance. Missing keys load as empty state.
    pub fn load(&self) -> StoreResult<(Roster, AttendanceBook)> {
        let roster = match self.store.get(STUDENTS_KEY)? {
            Some(text) => decode_roster(&text)?,
            None => Roster::new(),
        };
        let book = match self.store.get(ATTENDANCE_KEY)? {
            Some(text) => decode_attendance(&text, &roster)?,
            None => AttendanceBook::new(),
        };

        info!(
            "event=tracker_load module=repo status=ok students={} dates={} entries={}",
            roster.len(),
            book.days().len(),
            book.entry_count()
        );
        Ok((roster, book))
    }

    /// Writes both keys.
    pub fn save(&self, roster: &Roster, book: &AttendanceBook) -> StoreResult<()> {
        let students = encode_json(&roster.students())?;
        let attendance = encode_json(&encode_attendance(book))?;
        self.store.set(STUDENTS_KEY, &students)?;
        self.store.set(ATTENDANCE_KEY, &attendance)?;
        Ok(())
    }
}

fn decode_roster(text: &str) -> StoreResult<Roster> {
    let students: Vec<Student> = serde_json::from_str(text)
        .map_err(|err| StoreError::InvalidData(format!("{STUDENTS_KEY}: {err}")))?;
    for student in &students {
        student.validate().map_err(|err| {
            StoreError::InvalidData(format!("{STUDENTS_KEY}: student `{}`: {err}", student.id))
        })?;
    }
    Ok(Roster::from_students(students))
}

fn decode_attendance(text: &str, roster: &Roster) -> StoreResult<AttendanceBook> {
    let raw: RawAttendance = serde_json::from_str(text)
        .map_err(|err| StoreError::InvalidData(format!("{ATTENDANCE_KEY}: {err}")))?;

    let mut book = AttendanceBook::new();
    let mut dropped = 0usize;
    for (raw_date, day) in &raw {
        let Ok(date) = DateKey::parse(raw_date) else {
            warn!(
                "event=tracker_load module=repo status=skip reason=invalid_date entries={}",
                day.len()
            );
            dropped += day.len();
            continue;
        };
        for (raw_id, raw_status) in day {
            let id = StudentId::from(raw_id.as_str());
            match normalize(Some(raw_status)).mark() {
                Some(mark) if roster.contains(&id) => book.record(&date, &id, mark),
                Some(_) => {
                    warn!(
                        "event=tracker_load module=repo status=skip reason=unknown_student date={} student_id={}",
                        date, id
                    );
                    dropped += 1;
                }
                None => {
                    warn!(
                        "event=tracker_load module=repo status=skip reason=unrecognized_status date={} student_id={}",
                        date, id
                    );
                    dropped += 1;
                }
            }
        }
    }

    if dropped > 0 {
        warn!("event=tracker_load module=repo status=partial dropped_entries={dropped}");
    }
    Ok(book)
}

fn encode_attendance(book: &AttendanceBook) -> BTreeMap<&str, BTreeMap<&str, &'static str>> {
    book.days()
        .iter()
        .map(|(date, day)| {
            let entries = day
                .iter()
                .map(|(id, mark)| (id.as_str(), mark.as_storage_str()))
                .collect();
            (date.as_str(), entries)
        })
        .collect()
}

fn encode_json<T: serde::Serialize + ?Sized>(value: &T) -> StoreResult<String> {
    serde_json::to_string(value)
        .map_err(|err| StoreError::InvalidData(format!("failed to encode tracker state: {err}")))
}

#[cfg(test)]
mod tests {
    use super::{TrackerRepository, ATTENDANCE_KEY, STUDENTS_KEY};
    use crate::model::date_key::DateKey;
    use crate::model::status::AttendanceStatus;
    use crate::model::student::StudentId;
    use crate::repo::kv_store::{KeyValueStore, MemoryKeyValueStore, StoreError};

    #[test]
    fn missing_keys_load_empty() {
        let repo = TrackerRepository::new(MemoryKeyValueStore::new());
        let (roster, book) = repo.load().unwrap();
        assert!(roster.is_empty());
        assert!(book.is_empty());
    }

    #[test]
    fn legacy_encodings_normalize_and_garbage_is_dropped() {
        let store = MemoryKeyValueStore::new();
        store
            .set(STUDENTS_KEY, r#"[{"id":"s_1","name":"Old"},{"id":"s_2","name":"New","roll":"7"}]"#)
            .unwrap();
        store
            .set(
                ATTENDANCE_KEY,
                r#"{
                    "2024-01-01": {"s_1": true, "s_2": "absent"},
                    "2024-01-02": {"s_1": false, "s_2": "present", "s_gone": true},
                    "2024-01-03": {"s_1": "maybe"},
                    "undefined": {"s_1": true}
                }"#,
            )
            .unwrap();

        let repo = TrackerRepository::new(&store);
        let (roster, book) = repo.load().unwrap();
        assert_eq!(roster.students()[0].roll, "");

        let s1 = StudentId::from("s_1");
        let s2 = StudentId::from("s_2");
        let d1 = DateKey::parse("2024-01-01").unwrap();
        let d2 = DateKey::parse("2024-01-02").unwrap();
        assert_eq!(book.status(&d1, &s1), AttendanceStatus::Present);
        assert_eq!(book.status(&d1, &s2), AttendanceStatus::Absent);
        assert_eq!(book.status(&d2, &s1), AttendanceStatus::Absent);
        assert_eq!(book.status(&d2, &s2), AttendanceStatus::Present);
        assert_eq!(book.entry_count(), 4);
        assert_eq!(book.days().len(), 2);
    }

    #[test]
    fn save_writes_string_encoding() {
        let store = MemoryKeyValueStore::new();
        store.set(STUDENTS_KEY, r#"[{"id":"s_1","name":"Old"}]"#).unwrap();
        store.set(ATTENDANCE_KEY, r#"{"2024-01-01":{"s_1":true}}"#).unwrap();

        let repo = TrackerRepository::new(&store);
        let (roster, book) = repo.load().unwrap();
        repo.save(&roster, &book).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&store.get(ATTENDANCE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved["2024-01-01"]["s_1"], "present");
        let students: serde_json::Value =
            serde_json::from_str(&store.get(STUDENTS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(students[0]["roll"], "");
    }

    #[test]
    fn malformed_json_is_invalid_data() {
        let store = MemoryKeyValueStore::new();
        store.set(STUDENTS_KEY, "{not json").unwrap();
        let err = TrackerRepository::new(&store).load().err().unwrap();
        assert!(matches!(err, StoreError::InvalidData(_)));

        store.set(STUDENTS_KEY, r#"[{"id":"s_1","name":"  "}]"#).unwrap();
        let err = TrackerRepository::new(&store).load().err().unwrap();
        assert!(err.to_string().contains("name cannot be empty"));
    }
}
