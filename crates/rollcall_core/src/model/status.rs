//! Attendance status domain and raw-value normalization.
//!
//! # Responsibility
//! - Define the tri-state status shown to callers and the two-valued mark
//!   that is actually stored.
//! - Be the single place where raw stored or imported values are read.
//!
//! # Invariants
//! - `Unset` is never stored; it is the absence of a `Mark`.
//! - Legacy boolean and string encodings normalize to the same `Mark`.
//! - Normalization never fails and never panics.

use serde_json::Value;
use std::fmt::{Display, Formatter};

const PRESENT_STORAGE: &str = "present";
const ABSENT_STORAGE: &str = "absent";

/// Explicit attendance mark for one (date, student) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Present,
    Absent,
}

impl Mark {
    /// Encoding written by every save.
    pub fn as_storage_str(self) -> &'static str {
        match self {
            Self::Present => PRESENT_STORAGE,
            Self::Absent => ABSENT_STORAGE,
        }
    }

    /// Value of the `present` CSV column.
    pub fn as_csv_flag(self) -> &'static str {
        match self {
            Self::Present => "1",
            Self::Absent => "0",
        }
    }
}

/// Status of a (date, student) pair as seen by readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttendanceStatus {
    Present,
    Absent,
    /// No entry recorded.
    Unset,
}

impl AttendanceStatus {
    /// Returns the storable mark, or `None` for `Unset`.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Self::Present => Some(Mark::Present),
            Self::Absent => Some(Mark::Absent),
            Self::Unset => None,
        }
    }

    pub fn is_set(self) -> bool {
        self != Self::Unset
    }

    /// `1`, `0` or empty for the export `present` column.
    pub fn csv_flag(self) -> &'static str {
        self.mark().map_or("", Mark::as_csv_flag)
    }
}

impl From<Option<Mark>> for AttendanceStatus {
    fn from(value: Option<Mark>) -> Self {
        match value {
            Some(Mark::Present) => Self::Present,
            Some(Mark::Absent) => Self::Absent,
            None => Self::Unset,
        }
    }
}

impl From<Mark> for AttendanceStatus {
    fn from(value: Mark) -> Self {
        Some(value).into()
    }
}

impl Display for AttendanceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Absent => write!(f, "absent"),
            Self::Unset => write!(f, "unset"),
        }
    }
}

/// Normalizes a raw stored value into the canonical status domain.
///
/// Accepts the legacy boolean encoding (`true`/`false`) and the string
/// encoding (`"present"`/`"absent"`, case-sensitive). A missing value and
/// any unrecognized value both read as `Unset`.
pub fn normalize(raw: Option<&Value>) -> AttendanceStatus {
    match raw {
        Some(Value::Bool(true)) => AttendanceStatus::Present,
        Some(Value::Bool(false)) => AttendanceStatus::Absent,
        Some(Value::String(text)) if text == PRESENT_STORAGE => AttendanceStatus::Present,
        Some(Value::String(text)) if text == ABSENT_STORAGE => AttendanceStatus::Absent,
        _ => AttendanceStatus::Unset,
    }
}

/// Parses the `present` column of an imported CSV row.
///
/// Returns `None` for anything unrecognized; callers must treat that as
/// "leave the existing entry alone", not as a request to clear it.
pub fn parse_present_token(raw: &str) -> Option<Mark> {
    let token = raw.trim();
    if token == "1" {
        return Some(Mark::Present);
    }
    if token == "0" {
        return Some(Mark::Absent);
    }
    match token.to_ascii_lowercase().as_str() {
        "true" | "p" => Some(Mark::Present),
        "false" | "a" | "absent" => Some(Mark::Absent),
        _ => None,
    }
}
