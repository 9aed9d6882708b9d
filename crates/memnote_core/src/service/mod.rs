//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Own domain validation so transport layers stay thin.

pub mod note_service;
