//! Attendance domain model.
//!
//! # Responsibility
//! - Define the canonical student, roster, status and date-key types.
//! - Own the pure mutation rules of the attendance map.
//!
//! # Invariants
//! - Every student is identified by a stable `StudentId`.
//! - Raw stored values are interpreted only through `status::normalize`.

pub mod attendance;
pub mod date_key;
pub mod roster;
pub mod status;
pub mod student;
