//! HTTP error mapping.
//!
//! Domain failures become 400 with their message; anything else is a 500
//! whose details stay in the log.

use axum::extract::rejection::{JsonRejection, PathRejection, StringRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use memnote_core::NoteServiceError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] NoteServiceError),
    /// The request body could not be read as the expected shape.
    #[error("{message}")]
    Body { status: StatusCode, message: String },
    /// The blocking task running the store operation did not complete.
    #[error("store task failed: {0}")]
    Dispatch(#[from] tokio::task::JoinError),
}

impl AppError {
    /// Extractor failure. Oversized bodies keep 413; anything else is a 400.
    fn rejected(status: StatusCode, message: String) -> Self {
        let status = match status {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::Body { status, message }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<StringRejection> for AppError {
    fn from(rejection: StringRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::rejected(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Service(err) if err.is_domain_error() => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Body { status, message } => (*status, message.clone()),
            Self::Service(_) | Self::Dispatch(_) => {
                error!("event=http_error module=http status=error error={self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage unavailable".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
