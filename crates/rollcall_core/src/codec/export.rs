//! CSV export of attendance.
//!
//! # Invariants
//! - Header is always `studentRoll,studentName,date,present`.
//! - Roll and name are always quoted; date and present are bare.
//! - Rows follow roster order within a date and ascending date order across
//!   dates.

use crate::codec::split::quote_field;
use crate::model::attendance::AttendanceBook;
use crate::model::date_key::{DateKey, DateKeyError};
use crate::model::roster::Roster;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const EXPORT_HEADER: &str = "studentRoll,studentName,date,present";
const ALL_DATES_FILE_NAME: &str = "attendance_all_dates.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// No date was picked.
    MissingDate,
    InvalidDate(String),
    /// The date has no attendance recorded.
    NoEntries(DateKey),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDate => write!(f, "pick a date to export"),
            Self::InvalidDate(value) => {
                write!(f, "invalid export date `{value}`; expected YYYY-MM-DD")
            }
            Self::NoEntries(date) => write!(f, "no attendance recorded for {date}"),
        }
    }
}

impl Error for ExportError {}

impl From<DateKeyError> for ExportError {
    fn from(value: DateKeyError) -> Self {
        match value {
            DateKeyError::Empty => Self::MissingDate,
            DateKeyError::Invalid(raw) => Self::InvalidDate(raw),
        }
    }
}

/// Exports every roster student for one date.
///
/// Fails when `date` is blank or invalid, or when nothing is recorded for it.
pub fn export_date(roster: &Roster, book: &AttendanceBook, date: &str) -> Result<String, ExportError> {
    let date = DateKey::parse(date)?;
    if !book.has_entries(&date) {
        return Err(ExportError::NoEntries(date));
    }

    let mut lines = vec![EXPORT_HEADER.to_string()];
    push_date_rows(&mut lines, roster, book, &date);
    Ok(lines.join("\n"))
}

/// Exports every (recorded date x roster student) pair.
///
/// With no recorded dates the result is the header line alone.
pub fn export_all(roster: &Roster, book: &AttendanceBook) -> String {
    let mut lines = vec![EXPORT_HEADER.to_string()];
    for date in book.recorded_dates() {
        push_date_rows(&mut lines, roster, book, date);
    }
    lines.join("\n")
}

/// Download file name for a single-date or all-dates export.
pub fn export_file_name(date: Option<&DateKey>) -> String {
    match date {
        Some(date) => format!("attendance_{date}.csv"),
        None => ALL_DATES_FILE_NAME.to_string(),
    }
}

fn push_date_rows(lines: &mut Vec<String>, roster: &Roster, book: &AttendanceBook, date: &DateKey) {
    for student in roster {
        let status = book.status(date, &student.id);
        lines.push(format!(
            "{},{},{},{}",
            quote_field(&student.roll),
            quote_field(&student.name),
            date,
            status.csv_flag()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::{export_all, export_date, export_file_name, ExportError};
    use crate::model::attendance::AttendanceBook;
    use crate::model::date_key::DateKey;
    use crate::model::roster::Roster;
    use crate::model::status::Mark;
    use crate::model::student::Student;

    fn date(value: &str) -> DateKey {
        DateKey::parse(value).unwrap()
    }

    #[test]
    fn export_date_requires_date_and_entries() {
        let roster = Roster::new();
        let book = AttendanceBook::new();

        assert_eq!(export_date(&roster, &book, " "), Err(ExportError::MissingDate));
        assert!(matches!(
            export_date(&roster, &book, "someday"),
            Err(ExportError::InvalidDate(_))
        ));
        assert_eq!(
            export_date(&roster, &book, "2024-01-01"),
            Err(ExportError::NoEntries(date("2024-01-01")))
        );
    }

    #[test]
    fn export_quotes_roll_and_name_and_leaves_unset_blank() {
        let mut roster = Roster::new();
        let alice = Student::new(r#"Alice "Al" Smith"#, "001").unwrap();
        let bob = Student::new("Bob, Jr", "").unwrap();
        let mut book = AttendanceBook::new();
        book.record(&date("2024-01-01"), &alice.id, Mark::Present);
        roster.push(alice);
        roster.push(bob);

        let csv = export_date(&roster, &book, "2024-01-01").unwrap();
        assert_eq!(
            csv,
            "studentRoll,studentName,date,present\n\
             \"001\",\"Alice \"\"Al\"\" Smith\",2024-01-01,1\n\
             \"\",\"Bob, Jr\",2024-01-01,"
        );
    }

    #[test]
    fn export_all_orders_by_date_then_roster() {
        let mut roster = Roster::new();
        let a = Student::new("A", "1").unwrap();
        let b = Student::new("B", "2").unwrap();
        let mut book = AttendanceBook::new();
        book.record(&date("2024-02-01"), &b.id, Mark::Absent);
        book.record(&date("2024-01-01"), &a.id, Mark::Present);
        roster.push(a);
        roster.push(b);

        let csv = export_all(&roster, &book);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "studentRoll,studentName,date,present",
                "\"1\",\"A\",2024-01-01,1",
                "\"2\",\"B\",2024-01-01,",
                "\"1\",\"A\",2024-02-01,",
                "\"2\",\"B\",2024-02-01,0",
            ]
        );
    }

    #[test]
    fn file_names_follow_convention() {
        assert_eq!(
            export_file_name(Some(&date("2024-03-04"))),
            "attendance_2024-03-04.csv"
        );
        assert_eq!(export_file_name(None), "attendance_all_dates.csv");
    }
}
