//! Client side of memnote: HTTP API client, UI state and its controller.

pub mod api;
pub mod app;
pub mod render;
pub mod state;

pub use api::{ApiError, NotesApi, DEFAULT_BASE_URL};
pub use app::{CreateMode, NotesApp};
pub use state::{ClientState, EditDraft};
