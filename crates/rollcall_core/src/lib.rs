//! Core attendance tracking logic.
//! This crate is the single source of truth for roster and attendance
//! invariants; presentation layers call into `AttendanceTracker`.

pub mod codec;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;

pub use codec::export::{export_file_name, ExportError, EXPORT_HEADER};
pub use codec::import::{ImportError, ImportHeader, ImportSummary};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::attendance::AttendanceBook;
pub use model::date_key::{DateKey, DateKeyError};
pub use model::roster::Roster;
pub use model::status::{normalize, parse_present_token, AttendanceStatus, Mark};
pub use model::student::{Student, StudentId, StudentValidationError};
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};
pub use repo::tracker_repo::{TrackerRepository, ATTENDANCE_KEY, STUDENTS_KEY};
pub use service::tracker_service::{
    AttendanceTracker, ConfirmPrompt, MutationOutcome, RosterRow, TrackerError, TrackerResult,
};
pub use stats::percentage::{percent_for, summary_for, AttendancePercent, AttendanceSummary};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
