//! CSV codec for attendance exchange.
//!
//! # Responsibility
//! - Serialize one date or all dates to CSV text.
//! - Parse CSV text back into roster and attendance mutations.
//!
//! # Invariants
//! - Export quoting and import splitting share one convention, so roll and
//!   name fields survive an export/import round trip unchanged.

pub mod export;
pub mod import;
pub mod split;
