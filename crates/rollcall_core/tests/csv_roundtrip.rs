use rollcall_core::{
    AttendanceStatus, AttendanceTracker, ConfirmPrompt, DateKey, Mark, MemoryKeyValueStore,
};
use std::collections::BTreeSet;

fn yes(_: &ConfirmPrompt) -> bool {
    true
}

/// (date, roll, status) triples for every recorded entry.
fn triples(tracker: &AttendanceTracker<&MemoryKeyValueStore>) -> BTreeSet<(String, String, String)> {
    let mut out = BTreeSet::new();
    for (date, day) in tracker.attendance().days() {
        for (id, mark) in day {
            let roll = tracker.roster().find_by_id(id).unwrap().roll.clone();
            out.insert((
                date.to_string(),
                roll,
                AttendanceStatus::from(*mark).to_string(),
            ));
        }
    }
    out
}

#[test]
fn export_all_then_import_reproduces_entries() {
    let source_store = MemoryKeyValueStore::new();
    let mut source = AttendanceTracker::load(&source_store).unwrap();
    let a = source.add_student("Doe, Jane", "001", yes).unwrap().applied().unwrap().id;
    let b = source
        .add_student(r#"Sam "Sly" Stone"#, "A-2", yes)
        .unwrap()
        .applied()
        .unwrap()
        .id;
    let c = source.add_student("Unmarked", "003", yes).unwrap().applied().unwrap().id;
    source.set_status("2024-01-01", &a, Mark::Present).unwrap();
    source.set_status("2024-01-01", &b, Mark::Absent).unwrap();
    source.set_status("2024-01-02", &b, Mark::Present).unwrap();
    source.set_status("2024-01-03", &a, Mark::Absent).unwrap();

    let csv = source.export_all();

    let target_store = MemoryKeyValueStore::new();
    let mut target = AttendanceTracker::load(&target_store).unwrap();
    let summary = target.import_text(&csv).unwrap();

    assert_eq!(summary.rows, 9);
    assert_eq!(summary.students_created, 3);
    assert_eq!(triples(&target), triples(&source));

    let names: Vec<&str> = target.roster().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Doe, Jane", r#"Sam "Sly" Stone"#, "Unmarked"]);
    let unmarked = target.roster().find_by_roll("003").unwrap();
    assert_ne!(unmarked.id, c);
    assert_eq!(target.percent_for(&unmarked.id).to_string(), "-");
}

#[test]
fn reimporting_same_file_is_idempotent() {
    let store = MemoryKeyValueStore::new();
    let mut tracker = AttendanceTracker::load(&store).unwrap();
    let text = "studentRoll,studentName,date,present\n\"1\",\"A\",2024-02-01,1\n\"2\",\"B\",2024-02-01,0";

    tracker.import_text(text).unwrap();
    let first = tracker.export_all();
    let summary = tracker.import_text(text).unwrap();

    assert_eq!(summary.students_created, 0);
    assert_eq!(summary.students_updated, 2);
    assert_eq!(tracker.export_all(), first);
}

#[test]
fn import_overwrites_without_toggle_off() {
    let store = MemoryKeyValueStore::new();
    let mut tracker = AttendanceTracker::load(&store).unwrap();
    let id = tracker.add_student("A", "1", yes).unwrap().applied().unwrap().id;
    tracker.set_status("2024-03-01", &id, Mark::Present).unwrap();

    tracker
        .import_text("studentRoll,date,present\n1,2024-03-01,TRUE")
        .unwrap();
    let date = DateKey::parse("2024-03-01").unwrap();
    assert_eq!(tracker.status(&date, &id), AttendanceStatus::Present);

    tracker
        .import_text("STUDENTROLL,DATE,PRESENT\n1,2024-03-01,absent")
        .unwrap();
    assert_eq!(tracker.status(&date, &id), AttendanceStatus::Absent);
}

#[test]
fn partial_rows_apply_independently() {
    let store = MemoryKeyValueStore::new();
    let mut tracker = AttendanceTracker::load(&store).unwrap();

    let summary = tracker
        .import_text(
            "studentName,date,present\nAnn,2024-04-01,1\nBen,not-a-date,1\nCal,2024-04-01,?\nDee,2024-04-01,a",
        )
        .unwrap();

    assert_eq!(summary.rows, 4);
    assert_eq!(summary.statuses_written, 2);
    assert_eq!(summary.invalid_dates, 1);
    assert_eq!(summary.statuses_skipped, 1);
    assert_eq!(tracker.roster().len(), 4);
    assert_eq!(tracker.attendance().entry_count(), 2);
}
