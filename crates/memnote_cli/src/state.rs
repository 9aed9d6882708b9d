//! UI-only client state.
//!
//! # Responsibility
//! - Hold the rendered note list and the named UI flags: `loading`, `error`,
//!   success banner, `editing`, `pending_delete`.
//! - Expose every flag change as an explicit transition.
//!
//! # Invariants
//! - At most one note is in edit mode.
//! - The error message stays until an operation succeeds.
//! - The success banner expires `SUCCESS_BANNER_TTL` after it was shown.
//! - The note list is never authoritative; it is replaced wholesale on reload.

use memnote_core::{Note, NoteId};
use std::time::{Duration, Instant};

pub const SUCCESS_BANNER_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
struct SuccessBanner {
    message: String,
    expires_at: Instant,
}

/// The note currently in edit mode and its unsaved text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: NoteId,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct ClientState {
    notes: Vec<Note>,
    loading: bool,
    error: Option<String>,
    success: Option<SuccessBanner>,
    editing: Option<EditDraft>,
    pending_delete: Option<Note>,
}

impl ClientState {
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&Note> {
        self.pending_delete.as_ref()
    }

    /// Returns the success banner if it has not expired at `now`.
    pub fn success_message(&self, now: Instant) -> Option<&str> {
        self.success
            .as_ref()
            .filter(|banner| now < banner.expires_at)
            .map(|banner| banner.message.as_str())
    }

    pub fn load_started(&mut self) {
        self.loading = true;
    }

    pub fn load_succeeded(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.loading = false;
        self.error = None;
    }

    /// A failed load empties the list rather than showing stale notes.
    pub fn load_failed(&mut self, message: impl Into<String>) {
        self.notes.clear();
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn mutation_succeeded(&mut self, message: impl Into<String>, now: Instant) {
        self.error = None;
        self.success = Some(SuccessBanner {
            message: message.into(),
            expires_at: now + SUCCESS_BANNER_TTL,
        });
    }

    pub fn mutation_failed(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Drops the banner once it has expired.
    pub fn clear_expired(&mut self, now: Instant) {
        if self.success_message(now).is_none() {
            self.success = None;
        }
    }

    /// Enters edit mode for `note`, replacing any other edit in progress.
    pub fn start_edit(&mut self, note: &Note) {
        self.editing = Some(EditDraft {
            id: note.id,
            text: note.message.clone(),
        });
    }

    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(draft) = self.editing.as_mut() {
            draft.text = text.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn request_delete(&mut self, note: &Note) {
        self.pending_delete = Some(note.clone());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientState, SUCCESS_BANNER_TTL};
    use memnote_core::{Note, NoteId};
    use std::time::{Duration, Instant};

    fn note(message: &str) -> Note {
        Note::new(NoteId::new_v4(), message)
    }

    #[test]
    fn success_banner_expires_after_ttl() {
        let mut state = ClientState::default();
        let shown_at = Instant::now();
        state.mutation_succeeded("Note created successfully!", shown_at);

        assert_eq!(
            state.success_message(shown_at + Duration::from_secs(1)),
            Some("Note created successfully!")
        );
        assert_eq!(state.success_message(shown_at + SUCCESS_BANNER_TTL), None);

        state.clear_expired(shown_at + SUCCESS_BANNER_TTL);
        assert_eq!(state.success_message(shown_at), None);
    }

    #[test]
    fn clear_expired_keeps_live_banner() {
        let mut state = ClientState::default();
        let shown_at = Instant::now();
        state.mutation_succeeded("saved", shown_at);

        state.clear_expired(shown_at + Duration::from_millis(10));
        assert_eq!(state.success_message(shown_at), Some("saved"));
    }

    #[test]
    fn error_is_sticky_until_a_success() {
        let mut state = ClientState::default();
        state.mutation_failed("Failed to create note.");

        state.load_started();
        assert_eq!(state.error(), Some("Failed to create note."));

        state.load_succeeded(vec![note("a")]);
        assert_eq!(state.error(), None);
        assert!(!state.is_loading());
    }

    #[test]
    fn failed_load_empties_list() {
        let mut state = ClientState::default();
        state.load_succeeded(vec![note("a"), note("b")]);

        state.load_started();
        assert!(state.is_loading());
        state.load_failed("offline");

        assert!(state.notes().is_empty());
        assert!(!state.is_loading());
        assert_eq!(state.error(), Some("offline"));
    }

    #[test]
    fn only_one_note_is_edited_at_a_time() {
        let mut state = ClientState::default();
        let first = note("first");
        let second = note("second");

        state.start_edit(&first);
        state.set_edit_text("changed");
        assert_eq!(state.editing().unwrap().text, "changed");

        state.start_edit(&second);
        let draft = state.editing().unwrap();
        assert_eq!(draft.id, second.id);
        assert_eq!(draft.text, "second");

        state.cancel_edit();
        assert!(state.editing().is_none());
    }

    #[test]
    fn set_edit_text_without_edit_mode_is_ignored() {
        let mut state = ClientState::default();
        state.set_edit_text("orphan");
        assert!(state.editing().is_none());
    }

    #[test]
    fn delete_prompt_can_be_cancelled() {
        let mut state = ClientState::default();
        let target = note("doomed");

        state.request_delete(&target);
        assert_eq!(state.pending_delete(), Some(&target));

        state.cancel_delete();
        assert!(state.pending_delete().is_none());
    }
}
