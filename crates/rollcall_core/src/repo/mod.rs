//! Persistence gateway and stored-state layout.
//!
//! # Responsibility
//! - Define the key-value contract the core persists through.
//! - Keep JSON encoding details out of the tracker service.
//!
//! # Invariants
//! - Decoding returns semantic errors (`InvalidData`) in addition to
//!   storage transport errors.

pub mod kv_store;
pub mod tracker_repo;
