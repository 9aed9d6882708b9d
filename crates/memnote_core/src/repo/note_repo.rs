//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Translate note CRUD intents into single-transaction SQL statements.
//! - Generate note ids on insert.
//!
//! # Invariants
//! - `update` and `delete` on an unknown id match zero rows and succeed.
//! - `list_all` returns rows in insertion order.
//! - Read paths reject persisted ids that are not valid UUIDs.

use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("invalid persisted note data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<r2d2::Error> for RepoError {
    fn from(value: r2d2::Error) -> Self {
        Self::Db(DbError::Pool(value))
    }
}

/// Repository interface for note CRUD operations.
pub trait NoteRepository {
    /// Inserts one note and returns its freshly generated id.
    fn insert(&self, message: &str) -> RepoResult<NoteId>;
    /// Replaces the message of a note. Returns the number of rows changed.
    fn update(&self, id: NoteId, message: &str) -> RepoResult<usize>;
    /// Deletes a note. Returns the number of rows removed.
    fn delete(&self, id: NoteId) -> RepoResult<usize>;
    /// Lists every note.
    fn list_all(&self) -> RepoResult<Vec<Note>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn write_tx(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert(&self, message: &str) -> RepoResult<NoteId> {
        let id = Uuid::new_v4();
        let tx = self.write_tx()?;
        tx.execute(
            "INSERT INTO notes (id, message) VALUES (?1, ?2);",
            params![id.to_string(), message],
        )?;
        tx.commit()?;
        Ok(id)
    }

    fn update(&self, id: NoteId, message: &str) -> RepoResult<usize> {
        let tx = self.write_tx()?;
        let changed = tx.execute(
            "UPDATE notes SET message = ?2 WHERE id = ?1;",
            params![id.to_string(), message],
        )?;
        tx.commit()?;
        Ok(changed)
    }

    fn delete(&self, id: NoteId) -> RepoResult<usize> {
        let tx = self.write_tx()?;
        let removed = tx.execute("DELETE FROM notes WHERE id = ?1;", [id.to_string()])?;
        tx.commit()?;
        Ok(removed)
    }

    fn list_all(&self) -> RepoResult<Vec<Note>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let notes = {
            let mut stmt = tx.prepare("SELECT id, message FROM notes ORDER BY rowid ASC;")?;
            let mut rows = stmt.query([])?;
            let mut notes = Vec::new();
            while let Some(row) = rows.next()? {
                let id_text: String = row.get("id")?;
                notes.push(Note {
                    id: parse_note_id(&id_text)?,
                    message: row.get("message")?,
                });
            }
            notes
        };
        tx.commit()?;
        Ok(notes)
    }
}

fn parse_note_id(value: &str) -> RepoResult<NoteId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in notes.id")))
}
