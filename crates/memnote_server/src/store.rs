//! Blocking-pool dispatch for note service calls.
//!
//! # Responsibility
//! - Run each service call on tokio's blocking pool with its own pooled
//!   connection, so SQLite I/O never runs on request tasks.
//!
//! # Invariants
//! - One call checks out one connection and runs one repository transaction.
//! - No application-level locks are held across calls.
//! - Invalid input is rejected on the request task, before a connection is
//!   checked out.

use crate::error::AppError;
use memnote_core::db::{build_pool, DbLocation, DbPool, DbResult};
use memnote_core::{
    validate_create, validate_delete, validate_update, Note, NoteService, NoteServiceError,
    RepoError, SqliteNoteRepository,
};

#[derive(Clone)]
pub struct NoteStore {
    pool: DbPool,
}

impl NoteStore {
    /// Opens the pool and runs migrations before any request is served.
    pub fn open(location: &DbLocation, max_connections: u32) -> DbResult<Self> {
        Ok(Self {
            pool: build_pool(location, max_connections)?,
        })
    }

    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Note>, AppError> {
        self.with_note_service(|service| service.list_all()).await
    }

    pub async fn create(&self, message: String) -> Result<(), AppError> {
        validate_create(&message)?;
        self.with_note_service(move |service| service.create(&message)).await
    }

    pub async fn update(&self, id: String, message: String) -> Result<(), AppError> {
        validate_update(&id, &message)?;
        self.with_note_service(move |service| service.update(&id, &message)).await
    }

    pub async fn delete(&self, id: String) -> Result<(), AppError> {
        validate_delete(&id)?;
        self.with_note_service(move |service| service.delete(&id)).await
    }

    async fn with_note_service<T, F>(&self, f: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> Result<T, NoteServiceError>
            + Send
            + 'static,
    {
        let pool = self.pool.clone();
        let result = tokio::task::spawn_blocking(move || {
            let conn = pool.get().map_err(RepoError::from)?;
            let service = NoteService::new(SqliteNoteRepository::new(&conn));
            f(&service)
        })
        .await?;
        Ok(result?)
    }
}
