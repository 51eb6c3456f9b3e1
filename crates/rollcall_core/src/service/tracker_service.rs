//! Attendance tracker use-case service.
//!
//! # Responsibility
//! - Own the roster, attendance map and selected date for one session.
//! - Expose the entry points a presentation layer calls.
//! - Persist through the repository after every mutation.
//!
//! # Invariants
//! - Validation failures and declined confirmations mutate nothing.
//! - Attendance entries only reference students present in the roster.
//! - `render` never mutates state.
//! - Import persists once after the whole input is applied.

use crate::codec::export::{self, ExportError};
use crate::codec::import::{self, ImportError, ImportSummary};
use crate::model::attendance::AttendanceBook;
use crate::model::date_key::{DateKey, DateKeyError};
use crate::model::roster::Roster;
use crate::model::status::{AttendanceStatus, Mark};
use crate::model::student::{Student, StudentId, StudentValidationError};
use crate::repo::kv_store::{KeyValueStore, StoreError};
use crate::repo::tracker_repo::TrackerRepository;
use crate::stats::percentage::{percent_for, summary_for, AttendancePercent, AttendanceSummary};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for tracker use-cases.
#[derive(Debug)]
pub enum TrackerError {
    /// Input failed record validation.
    Validation(StudentValidationError),
    /// Date input is blank or malformed.
    Date(DateKeyError),
    /// Target student does not exist.
    StudentNotFound(StudentId),
    Export(ExportError),
    Import(ImportError),
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for TrackerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(StudentValidationError::EmptyName) => {
                write!(f, "enter a student name")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Date(err) => write!(f, "{err}"),
            Self::StudentNotFound(id) => write!(f, "student not found: {id}"),
            Self::Export(err) => write!(f, "{err}"),
            Self::Import(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Date(err) => Some(err),
            Self::StudentNotFound(_) => None,
            Self::Export(err) => Some(err),
            Self::Import(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StudentValidationError> for TrackerError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DateKeyError> for TrackerError {
    fn from(value: DateKeyError) -> Self {
        Self::Date(value)
    }
}

impl From<ExportError> for TrackerError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

impl From<ImportError> for TrackerError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<StoreError> for TrackerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Question the presentation layer must answer before a gated mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmPrompt {
    /// Another student already uses this roll.
    DuplicateRoll { roll: String },
    RemoveStudent { id: StudentId, name: String },
    ClearAll,
}

impl Display for ConfirmPrompt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateRoll { roll } => write!(
                f,
                "A student with roll number `{roll}` already exists. Continue?"
            ),
            Self::RemoveStudent { name, .. } => write!(f, "Remove student `{name}`?"),
            Self::ClearAll => write!(f, "Clear all students and attendance?"),
        }
    }
}

/// Result of a confirmation-gated mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome<T> {
    Applied(T),
    /// The caller declined; nothing changed.
    Declined,
}

impl<T> MutationOutcome<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Declined => None,
        }
    }

    pub fn is_declined(&self) -> bool {
        matches!(self, Self::Declined)
    }
}

/// Read-only projection of one roster line for a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub id: StudentId,
    pub roll: String,
    pub name: String,
    pub status: AttendanceStatus,
    /// Counters behind `percent`.
    pub summary: AttendanceSummary,
    pub percent: AttendancePercent,
}

/// Explicitly owned tracker session over a key-value store.
pub struct AttendanceTracker<S: KeyValueStore> {
    repo: TrackerRepository<S>,
    roster: Roster,
    book: AttendanceBook,
    selected_date: DateKey,
}

impl<S: KeyValueStore> AttendanceTracker<S> {
    /// Hydrates state from `store` and selects today's date.
    pub fn load(store: S) -> TrackerResult<Self> {
        let repo = TrackerRepository::new(store);
        let (roster, book) = repo.load().map_err(|err| {
            error!("event=tracker_load module=service status=error error={err}");
            err
        })?;
        Ok(Self {
            repo,
            roster,
            book,
            selected_date: DateKey::today(),
        })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn attendance(&self) -> &AttendanceBook {
        &self.book
    }

    pub fn store(&self) -> &S {
        self.repo.store()
    }

    pub fn selected_date(&self) -> &DateKey {
        &self.selected_date
    }

    pub fn select_date(&mut self, date: &str) -> TrackerResult<()> {
        self.selected_date = DateKey::parse(date)?;
        Ok(())
    }

    pub fn status(&self, date: &DateKey, id: &StudentId) -> AttendanceStatus {
        self.book.status(date, id)
    }

    pub fn percent_for(&self, id: &StudentId) -> AttendancePercent {
        percent_for(&self.book, id)
    }

    /// Builds the table rows for `date` in roster order.
    pub fn render(&self, date: &DateKey) -> Vec<RosterRow> {
        self.roster
            .iter()
            .map(|student| {
                let summary = summary_for(&self.book, &student.id);
                RosterRow {
                    id: student.id.clone(),
                    roll: student.roll.clone(),
                    name: student.name.clone(),
                    status: self.book.status(date, &student.id),
                    summary,
                    percent: summary.percent(),
                }
            })
            .collect()
    }

    /// Applies a present/absent click for one student on `date`.
    ///
    /// Clicking the mark already in place clears it. Returns the resulting
    /// status.
    pub fn set_status(
        &mut self,
        date: &str,
        id: &StudentId,
        desired: Mark,
    ) -> TrackerResult<AttendanceStatus> {
        let date = DateKey::parse(date)?;
        if !self.roster.contains(id) {
            return Err(TrackerError::StudentNotFound(id.clone()));
        }

        let status = self.book.toggle(&date, id, desired);
        info!(
            "event=set_status module=service status=ok date={} student_id={} result={}",
            date, id, status
        );
        self.persist()?;
        Ok(status)
    }

    /// Adds a student at the roster tail.
    ///
    /// `confirm` is consulted only when `roll` is already in use.
    pub fn add_student(
        &mut self,
        name: &str,
        roll: &str,
        confirm: impl FnOnce(&ConfirmPrompt) -> bool,
    ) -> TrackerResult<MutationOutcome<Student>> {
        let student = Student::new(name, roll)?;
        if student.has_roll() && self.roster.roll_in_use(&student.roll) {
            let prompt = ConfirmPrompt::DuplicateRoll {
                roll: student.roll.clone(),
            };
            if !confirm(&prompt) {
                info!("event=add_student module=service status=declined reason=duplicate_roll");
                return Ok(MutationOutcome::Declined);
            }
        }

        self.roster.push(student.clone());
        info!(
            "event=add_student module=service status=ok student_id={} students={}",
            student.id,
            self.roster.len()
        );
        self.persist()?;
        Ok(MutationOutcome::Applied(student))
    }

    /// Removes a student and cascades the removal through every date.
    ///
    /// Returns `Applied(None)` when no student has `id`.
    pub fn remove_student(
        &mut self,
        id: &StudentId,
        confirm: impl FnOnce(&ConfirmPrompt) -> bool,
    ) -> TrackerResult<MutationOutcome<Option<Student>>> {
        let prompt = ConfirmPrompt::RemoveStudent {
            id: id.clone(),
            name: self
                .roster
                .find_by_id(id)
                .map_or_else(|| id.to_string(), |student| student.name.clone()),
        };
        if !confirm(&prompt) {
            return Ok(MutationOutcome::Declined);
        }

        let removed = self.roster.remove(id);
        let entries = self.book.remove_student(id);
        info!(
            "event=remove_student module=service status=ok student_id={} found={} entries_removed={}",
            id,
            removed.is_some(),
            entries
        );
        self.persist()?;
        Ok(MutationOutcome::Applied(removed))
    }

    /// Empties the roster and the attendance map together.
    pub fn clear_all(
        &mut self,
        confirm: impl FnOnce(&ConfirmPrompt) -> bool,
    ) -> TrackerResult<MutationOutcome<()>> {
        if !confirm(&ConfirmPrompt::ClearAll) {
            return Ok(MutationOutcome::Declined);
        }

        self.roster.clear();
        self.book.clear();
        info!("event=clear_all module=service status=ok");
        self.persist()?;
        Ok(MutationOutcome::Applied(()))
    }

    /// User-initiated save. Every mutation already saves.
    pub fn save(&self) -> TrackerResult<()> {
        self.persist()
    }

    pub fn export_date(&self, date: &str) -> TrackerResult<String> {
        let csv = export::export_date(&self.roster, &self.book, date)?;
        info!(
            "event=csv_export module=service status=ok scope=date rows={}",
            self.roster.len()
        );
        Ok(csv)
    }

    pub fn export_all(&self) -> String {
        let csv = export::export_all(&self.roster, &self.book);
        info!(
            "event=csv_export module=service status=ok scope=all dates={}",
            self.book.days().len()
        );
        csv
    }

    /// Applies CSV text and persists once.
    ///
    /// Rows are applied independently: a later unparseable row does not
    /// roll back earlier ones.
    pub fn import_text(&mut self, text: &str) -> TrackerResult<ImportSummary> {
        let summary = import::import_text(&mut self.roster, &mut self.book, text).map_err(|err| {
            error!("event=csv_import module=service status=error error={err}");
            err
        })?;
        info!(
            "event=csv_import module=service status=ok rows={} created={} updated={} written={} skipped={} invalid_dates={}",
            summary.rows,
            summary.students_created,
            summary.students_updated,
            summary.statuses_written,
            summary.statuses_skipped,
            summary.invalid_dates
        );
        self.persist()?;
        Ok(summary)
    }

    fn persist(&self) -> TrackerResult<()> {
        self.repo.save(&self.roster, &self.book).map_err(|err| {
            error!("event=tracker_save module=service status=error error={err}");
            TrackerError::Store(err)
        })
    }
}
