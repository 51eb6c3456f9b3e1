//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model mutations and persistence into use-case APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod tracker_service;
