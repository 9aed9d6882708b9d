//! Domain model types.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep domain semantics independent from storage and transport layers.

pub mod note;
