//! CSV import into the roster and attendance map.
//!
//! # Responsibility
//! - Locate identity, date and present columns in a loose header.
//! - Resolve each row to a student (id, then roll, then name), creating
//!   students that do not exist yet.
//! - Write recognized present/absent tokens as overwrites.
//!
//! # Invariants
//! - Structural failures (no lines, missing columns) mutate nothing.
//! - Rows are applied one by one. A bad present value or date in one row
//!   does not undo earlier rows; re-importing a corrected file re-applies
//!   every row idempotently because entries are keyed by (date, student).
//! - An unrecognized present value never deletes an existing entry.

use crate::codec::split::read_record;
use crate::model::attendance::AttendanceBook;
use crate::model::date_key::DateKey;
use crate::model::roster::Roster;
use crate::model::status::parse_present_token;
use crate::model::student::{Student, StudentId};
use csv::StringRecord;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const UNKNOWN_STUDENT_NAME: &str = "Unknown";
const UTF8_BOM: char = '\u{feff}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Input had no non-blank lines.
    Empty,
    /// The header line could not be read as CSV.
    Unreadable(String),
    /// Header lacks required columns. Flags are `true` when missing.
    MissingColumns {
        date: bool,
        present: bool,
        identity: bool,
    },
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "CSV seems empty"),
            Self::Unreadable(message) => write!(f, "CSV header could not be read: {message}"),
            Self::MissingColumns { .. } => write!(
                f,
                "CSV must include date and present columns, and at least one of studentRoll or studentName or studentId"
            ),
        }
    }
}

impl Error for ImportError {}

/// Column positions found in an import header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportHeader {
    pub student_id: Option<usize>,
    pub student_roll: Option<usize>,
    pub student_name: Option<usize>,
    pub date: usize,
    pub present: usize,
}

impl ImportHeader {
    /// Parses a header line. Column names are matched case-insensitively,
    /// in any order; unknown columns are ignored.
    pub fn parse(line: &str) -> Result<Self, ImportError> {
        let record = read_record(line.trim_start_matches(UTF8_BOM))
            .map_err(|err| ImportError::Unreadable(err.to_string()))?;
        let columns: Vec<String> = record
            .iter()
            .map(|name| name.trim().to_lowercase())
            .collect();
        let find = |name: &str| columns.iter().position(|column| column == name);

        let student_id = find("studentid");
        let student_roll = find("studentroll");
        let student_name = find("studentname");
        let date = find("date");
        let present = find("present");
        let has_identity = student_id.is_some() || student_roll.is_some() || student_name.is_some();

        match (date, present) {
            (Some(date), Some(present)) if has_identity => Ok(Self {
                student_id,
                student_roll,
                student_name,
                date,
                present,
            }),
            _ => Err(ImportError::MissingColumns {
                date: date.is_none(),
                present: present.is_none(),
                identity: !has_identity,
            }),
        }
    }
}

/// Counters describing what an import did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Data rows processed.
    pub rows: usize,
    pub students_created: usize,
    /// Existing students matched by a row.
    pub students_updated: usize,
    pub statuses_written: usize,
    /// Rows that wrote nothing because the present value was not
    /// recognized or the line was not readable CSV.
    pub statuses_skipped: usize,
    /// Rows whose date was blank or not `YYYY-MM-DD`.
    pub invalid_dates: usize,
}

/// One data row after field extraction.
struct ImportRow<'a> {
    id: &'a str,
    roll: &'a str,
    name: &'a str,
    date: &'a str,
    present: &'a str,
}

impl<'a> ImportRow<'a> {
    fn from_record(header: &ImportHeader, record: &'a StringRecord) -> Self {
        let field = move |index: Option<usize>| -> &'a str {
            index
                .and_then(|index| record.get(index))
                .map_or("", str::trim)
        };
        Self {
            id: field(header.student_id),
            roll: field(header.student_roll),
            name: field(header.student_name),
            date: field(Some(header.date)),
            present: field(Some(header.present)),
        }
    }
}

/// Applies CSV `text` to `roster` and `book`.
///
/// Returns an error without touching either structure when the input is
/// blank or the header is unreadable or missing required columns.
pub fn import_text(
    roster: &mut Roster,
    book: &mut AttendanceBook,
    text: &str,
) -> Result<ImportSummary, ImportError> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let header_line = lines.next().ok_or(ImportError::Empty)?;
    let header = ImportHeader::parse(header_line)?;

    let mut summary = ImportSummary::default();
    for line in lines {
        summary.rows += 1;
        let record = match read_record(line) {
            Ok(record) => record,
            Err(err) => {
                summary.statuses_skipped += 1;
                warn!(
                    "event=csv_import_row module=codec status=skip reason=unreadable_row row={} error={}",
                    summary.rows, err
                );
                continue;
            }
        };
        let row = ImportRow::from_record(&header, &record);

        let student_id = resolve_student(roster, &row, &mut summary);

        let Some(mark) = parse_present_token(row.present) else {
            summary.statuses_skipped += 1;
            debug!(
                "event=csv_import_row module=codec status=skip reason=unrecognized_present row={}",
                summary.rows
            );
            continue;
        };

        match DateKey::parse(row.date) {
            Ok(date) => {
                book.record(&date, &student_id, mark);
                summary.statuses_written += 1;
            }
            Err(err) => {
                summary.invalid_dates += 1;
                warn!(
                    "event=csv_import_row module=codec status=skip reason=invalid_date row={} error={}",
                    summary.rows, err
                );
            }
        }
    }

    Ok(summary)
}

/// Finds or creates the student for `row`, enriching matched records.
///
/// A row with neither name nor roll is looked up and created under the
/// `"Unknown"` name, so repeated anonymous rows share one student.
fn resolve_student(roster: &mut Roster, row: &ImportRow<'_>, summary: &mut ImportSummary) -> StudentId {
    let lookup_name = if row.name.is_empty() && row.roll.is_empty() {
        UNKNOWN_STUDENT_NAME
    } else {
        row.name
    };
    let existing = (!row.id.is_empty())
        .then(|| roster.find_by_id(&StudentId::from(row.id)))
        .flatten()
        .or_else(|| roster.find_by_roll(row.roll))
        .or_else(|| roster.find_by_name(lookup_name))
        .map(|student| student.id.clone());

    if let Some(id) = existing {
        if let Some(student) = roster.find_by_id_mut(&id) {
            if !row.name.is_empty() {
                student.name = row.name.to_string();
            }
            if !row.roll.is_empty() {
                student.roll = row.roll.to_string();
            }
        }
        summary.students_updated += 1;
        return id;
    }

    let name = if row.name.is_empty() {
        UNKNOWN_STUDENT_NAME
    } else {
        row.name
    };
    let student = Student {
        id: StudentId::generate(),
        name: name.to_string(),
        roll: row.roll.to_string(),
    };
    let id = student.id.clone();
    roster.push(student);
    summary.students_created += 1;
    id
}
