use crate::state::ClientState;
use std::fmt::Write;
use std::time::Instant;

pub const EMPTY_STATE: &str = "No notes yet. Create your first note with `memnote add`.";

/// Renders the current state the way the list view shows it.
pub fn render(state: &ClientState, now: Instant) -> String {
    let mut out = String::new();

    if let Some(message) = state.success_message(now) {
        let _ = writeln!(out, "ok: {message}");
    }
    if let Some(error) = state.error() {
        let _ = writeln!(out, "error: {error}");
    }
    if state.is_loading() {
        let _ = writeln!(out, "Loading notes...");
        return out;
    }
    if state.notes().is_empty() {
        let _ = writeln!(out, "{EMPTY_STATE}");
        return out;
    }

    for note in state.notes() {
        let _ = writeln!(out, "ID: {}...", note.short_id());
        for line in note.message.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }
    out
}

/// Prompt shown before a delete is confirmed.
pub fn delete_prompt(state: &ClientState) -> Option<String> {
    state.pending_delete().map(|note| {
        format!(
            "Delete note \"{}\"? This action cannot be undone. [y/N] ",
            note.message
        )
    })
}
