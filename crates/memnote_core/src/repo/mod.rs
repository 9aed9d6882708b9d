//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repositories do not validate input; the service layer owns validation.
//! - Each repository call is one transaction.

pub mod note_repo;
