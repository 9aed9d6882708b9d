//! Note use-case service.
//!
//! # Responsibility
//! - Validate note ids and text before any storage access. The `validate_*`
//!   checks are public so callers can reject input before acquiring storage.
//! - Delegate list/create/update/delete to a `NoteRepository`.
//!
//! # Invariants
//! - Validation order is blank id, then malformed id, then blank text.
//! - Update and delete of an unknown id succeed without signalling not-found.
//! - Create does not expose the generated id to callers.
//! - Log events carry ids and lengths, never note text.

use crate::model::note::{is_blank, Note, NoteId};
use crate::repo::note_repo::{NoteRepository, RepoError};
use log::{debug, error, info, warn};
use uuid::Uuid;

/// Service error for note use-cases.
#[derive(Debug, thiserror::Error)]
pub enum NoteServiceError {
    #[error("ID cannot be blank")]
    BlankId,
    #[error("Text cannot be blank")]
    BlankText,
    #[error("Invalid UUID format: {0}")]
    MalformedId(String),
    /// Storage could not complete the operation.
    #[error("storage unavailable: {0}")]
    Storage(#[from] RepoError),
}

impl NoteServiceError {
    /// Returns `true` for validation failures caused by caller input.
    pub fn is_domain_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_all(&self) -> Result<Vec<Note>, NoteServiceError> {
        let notes = self.repo.list_all().inspect_err(log_storage_error("note_list"))?;
        debug!(
            "event=note_list module=service status=ok count={}",
            notes.len()
        );
        Ok(notes)
    }

    /// Creates one note. The generated id is intentionally not returned.
    pub fn create(&self, message: &str) -> Result<(), NoteServiceError> {
        validate_create(message)?;

        let id = self
            .repo
            .insert(message)
            .inspect_err(log_storage_error("note_create"))?;
        info!(
            "event=note_create module=service status=ok note_id={} len={}",
            id,
            message.chars().count()
        );
        Ok(())
    }

    /// Replaces the message of note `id`.
    pub fn update(&self, id: &str, message: &str) -> Result<(), NoteServiceError> {
        let note_id = validate_update(id, message)?;

        let changed = self
            .repo
            .update(note_id, message)
            .inspect_err(log_storage_error("note_update"))?;
        info!(
            "event=note_update module=service status=ok note_id={} rows={} len={}",
            note_id,
            changed,
            message.chars().count()
        );
        Ok(())
    }

    /// Removes note `id`.
    pub fn delete(&self, id: &str) -> Result<(), NoteServiceError> {
        let note_id = validate_delete(id)?;
        let removed = self
            .repo
            .delete(note_id)
            .inspect_err(log_storage_error("note_delete"))?;
        info!(
            "event=note_delete module=service status=ok note_id={} rows={}",
            note_id, removed
        );
        Ok(())
    }
}

/// Checks a create request without touching storage.
pub fn validate_create(message: &str) -> Result<(), NoteServiceError> {
    if is_blank(message) {
        log_rejection("note_create")(&NoteServiceError::BlankText);
        return Err(NoteServiceError::BlankText);
    }
    Ok(())
}

/// Checks an update request without touching storage and returns the parsed id.
pub fn validate_update(id: &str, message: &str) -> Result<NoteId, NoteServiceError> {
    let note_id = parse_note_id(id).inspect_err(log_rejection("note_update"))?;
    if is_blank(message) {
        log_rejection("note_update")(&NoteServiceError::BlankText);
        return Err(NoteServiceError::BlankText);
    }
    Ok(note_id)
}

pub fn validate_delete(id: &str) -> Result<NoteId, NoteServiceError> {
    parse_note_id(id).inspect_err(log_rejection("note_delete"))
}

/// Parses a caller-supplied id, reporting blank before malformed.
pub fn parse_note_id(id: &str) -> Result<NoteId, NoteServiceError> {
    if is_blank(id) {
        return Err(NoteServiceError::BlankId);
    }
    Uuid::parse_str(id).map_err(|_| NoteServiceError::MalformedId(id.to_string()))
}

fn log_rejection(event: &'static str) -> impl Fn(&NoteServiceError) {
    move |err| {
        let reason = match err {
            NoteServiceError::BlankId => "blank_id",
            NoteServiceError::MalformedId(_) => "malformed_id",
            NoteServiceError::BlankText => "blank_text",
            NoteServiceError::Storage(_) => "storage",
        };
        warn!("event={event} module=service status=rejected reason={reason}");
    }
}

fn log_storage_error(event: &'static str) -> impl Fn(&RepoError) {
    move |err| {
        error!("event={event} module=service status=error error_code=storage error={err}");
    }
}

#[cfg(test)]
mod tests {
    use super::{
        parse_note_id, validate_create, validate_delete, validate_update, NoteServiceError,
    };

    #[test]
    fn parse_note_id_reports_blank_before_malformed() {
        assert!(matches!(parse_note_id("  "), Err(NoteServiceError::BlankId)));
        assert!(matches!(
            parse_note_id("123"),
            Err(NoteServiceError::MalformedId(value)) if value == "123"
        ));
        assert!(parse_note_id("67e55044-10b1-426f-9247-bb680e5fe0c8").is_ok());
    }

    #[test]
    fn validators_follow_the_service_check_order() {
        assert!(matches!(validate_create(" \t"), Err(NoteServiceError::BlankText)));
        assert!(validate_create("x").is_ok());

        assert!(matches!(validate_update("", ""), Err(NoteServiceError::BlankId)));
        assert!(matches!(
            validate_update("123", ""),
            Err(NoteServiceError::MalformedId(_))
        ));
        assert!(matches!(
            validate_update("67e55044-10b1-426f-9247-bb680e5fe0c8", " "),
            Err(NoteServiceError::BlankText)
        ));
        assert!(matches!(validate_delete(" "), Err(NoteServiceError::BlankId)));
    }

    #[test]
    fn only_storage_errors_are_not_domain_errors() {
        assert!(NoteServiceError::BlankId.is_domain_error());
        assert!(NoteServiceError::BlankText.is_domain_error());
        assert!(NoteServiceError::MalformedId("x".into()).is_domain_error());
    }
}
