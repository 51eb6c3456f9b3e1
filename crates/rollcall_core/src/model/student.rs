//! Student domain model.
//!
//! # Responsibility
//! - Define the roster record and its stable identity.
//! - Validate the fields every persisted student must carry.
//!
//! # Invariants
//! - `id` is assigned at creation and never reused for another student.
//! - `name` is never blank.
//! - `roll` may be empty; uniqueness is advisory only.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const STUDENT_ID_PREFIX: &str = "s_";

/// Opaque stable student identifier.
///
/// Kept as a string so identifiers written by earlier versions
/// (`s_<millis>`) load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(format!("{STUDENT_ID_PREFIX}{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StudentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StudentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validation errors for student records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentValidationError {
    EmptyName,
    EmptyId,
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "student name cannot be empty"),
            Self::EmptyId => write!(f, "student id cannot be empty"),
        }
    }
}

impl Error for StudentValidationError {}

/// One roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    /// Human-facing roll number; empty when not assigned.
    #[serde(default)]
    pub roll: String,
}

impl Student {
    /// Creates a student with a generated id from trimmed input.
    pub fn new(
        name: impl AsRef<str>,
        roll: impl AsRef<str>,
    ) -> Result<Self, StudentValidationError> {
        Self::with_id(StudentId::generate(), name, roll)
    }

    /// Creates a student with a caller-provided id.
    pub fn with_id(
        id: StudentId,
        name: impl AsRef<str>,
        roll: impl AsRef<str>,
    ) -> Result<Self, StudentValidationError> {
        let student = Self {
            id,
            name: name.as_ref().trim().to_string(),
            roll: roll.as_ref().trim().to_string(),
        };
        student.validate()?;
        Ok(student)
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(StudentValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(StudentValidationError::EmptyName);
        }
        Ok(())
    }

    pub fn has_roll(&self) -> bool {
        !self.roll.is_empty()
    }
}
