//! Client controller: drives `ClientState` from API request lifecycles.
//!
//! # Invariants
//! - Every successful mutation is followed by a full list reload.
//! - Delete is only sent for a note that went through `request_delete`.
//! - Blank input never reaches the network.

use crate::api::{ApiError, NotesApi};
use crate::state::ClientState;
use log::{info, warn};
use memnote_core::{is_blank, Note};
use std::time::Instant;

pub const LOAD_FAILED: &str = "Failed to load notes. Please check if backend is running.";
pub const CREATE_FAILED: &str = "Failed to create note.";
pub const UPDATE_FAILED: &str = "Failed to update note.";
pub const DELETE_FAILED: &str = "Failed to delete note.";
pub const EDIT_EMPTY: &str = "Note cannot be empty.";

pub const CREATED: &str = "Note created successfully!";
pub const UPDATED: &str = "Note updated successfully!";
pub const DELETED: &str = "Note deleted successfully!";

/// How a new note is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    Json,
    /// Legacy plain-text `PUT /texts`.
    PlainText,
}

pub struct NotesApp {
    api: NotesApi,
    state: ClientState,
}

impl NotesApp {
    pub fn new(api: NotesApi) -> Self {
        Self {
            api,
            state: ClientState::default(),
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// Replaces the list with the server's current notes.
    pub async fn load(&mut self) {
        self.state.load_started();
        match self.api.list().await {
            Ok(notes) => self.state.load_succeeded(notes),
            Err(err) => {
                self.log_failure("notes_load", &err);
                self.state.load_failed(LOAD_FAILED);
            }
        }
    }

    pub async fn create(&mut self, text: &str, mode: CreateMode) {
        if is_blank(text) {
            return;
        }

        let result = match mode {
            CreateMode::Json => self.api.create(text).await,
            CreateMode::PlainText => self.api.create_plain(text).await,
        };
        match result {
            Ok(_) => {
                info!("event=note_create module=client status=ok mode={mode:?}");
                self.state.mutation_succeeded(CREATED, Instant::now());
                self.load().await;
            }
            Err(err) => {
                self.log_failure("note_create", &err);
                self.state.mutation_failed(CREATE_FAILED);
            }
        }
    }

    pub fn start_edit(&mut self, note: &Note) {
        self.state.start_edit(note);
    }

    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        self.state.set_edit_text(text);
    }

    pub fn cancel_edit(&mut self) {
        self.state.cancel_edit();
    }

    /// Saves the draft of the note in edit mode. No-op outside edit mode.
    pub async fn save_edit(&mut self) {
        let Some(draft) = self.state.editing().cloned() else {
            return;
        };
        if is_blank(&draft.text) {
            self.state.mutation_failed(EDIT_EMPTY);
            return;
        }

        match self.api.update(draft.id, &draft.text).await {
            Ok(_) => {
                info!(
                    "event=note_update module=client status=ok note_id={}",
                    draft.id
                );
                self.state.cancel_edit();
                self.state.mutation_succeeded(UPDATED, Instant::now());
                self.load().await;
            }
            Err(err) => {
                self.log_failure("note_update", &err);
                self.state.mutation_failed(UPDATE_FAILED);
            }
        }
    }

    pub fn request_delete(&mut self, note: &Note) {
        self.state.request_delete(note);
    }

    pub fn cancel_delete(&mut self) {
        self.state.cancel_delete();
    }

    /// Deletes the note awaiting confirmation. No-op when nothing is pending.
    pub async fn confirm_delete(&mut self) {
        let Some(note) = self.state.pending_delete().cloned() else {
            return;
        };

        match self.api.delete(note.id).await {
            Ok(_) => {
                info!(
                    "event=note_delete module=client status=ok note_id={}",
                    note.id
                );
                self.state.cancel_delete();
                self.state.mutation_succeeded(DELETED, Instant::now());
                self.load().await;
            }
            Err(err) => {
                self.log_failure("note_delete", &err);
                self.state.mutation_failed(DELETE_FAILED);
            }
        }
    }

    /// Drops the success banner once it has expired at `now`.
    pub fn clear_expired(&mut self, now: Instant) {
        self.state.clear_expired(now);
    }

    /// Finds a listed note by full id or by an unambiguous id prefix.
    pub fn find_note(&self, id_or_prefix: &str) -> Option<&Note> {
        let needle = id_or_prefix.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return None;
        }
        let mut matches = self
            .state
            .notes()
            .iter()
            .filter(|note| note.id.to_string().starts_with(&needle));
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
    }

    fn log_failure(&self, event: &str, err: &ApiError) {
        warn!(
            "event={event} module=client status=error base_url={} error={err}",
            self.api.base_url()
        );
    }
}
