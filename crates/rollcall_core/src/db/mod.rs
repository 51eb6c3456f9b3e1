//! SQLite bootstrap for the durable key-value gateway.
//!
//! # Responsibility
//! - Open file or in-memory connections configured for the tracker.
//! - Bring the schema up to date before any key is read or written.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A database written by a newer build is refused, never downgraded.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
