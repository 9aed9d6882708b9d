//! Note domain model.
//!
//! # Responsibility
//! - Define the only persisted record: a free-text note keyed by UUID.
//! - Provide the shared blank-text predicate used by every validating layer.
//!
//! # Invariants
//! - `id` is assigned once at insert time and never reassigned.
//! - `message` is never blank for a persisted note.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a note.
///
/// Serialized as the canonical hyphenated UUID string.
pub type NoteId = Uuid;

/// One persisted note as returned by listing operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub message: String,
}

impl Note {
    pub fn new(id: NoteId, message: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
        }
    }

    /// Returns the first eight characters of the id, as shown in list views.
    pub fn short_id(&self) -> String {
        self.id.to_string().chars().take(8).collect()
    }
}

/// Returns whether `value` is empty or contains only whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::{is_blank, Note};
    use uuid::Uuid;

    #[test]
    fn blank_covers_empty_and_whitespace_only() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n "));
        assert!(!is_blank(" a "));
    }

    #[test]
    fn note_serializes_id_as_hyphenated_string() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let json = serde_json::to_value(Note::new(id, "hi")).unwrap();
        assert_eq!(json["id"], "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert_eq!(json["message"], "hi");
    }

    #[test]
    fn short_id_keeps_first_eight_chars() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(Note::new(id, "x").short_id(), "67e55044");
    }
}
