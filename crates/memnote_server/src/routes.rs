//! `/texts` HTTP routes.
//!
//! Success bodies are plain-text confirmations; failures go through
//! [`AppError`]. Extractors are taken as `Result` so their rejections use the
//! same error body.

use crate::error::AppError;
use crate::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection, StringRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use memnote_core::Note;
use serde::Deserialize;

pub const TEXT_CREATED: &str = "Text created";
pub const TEXT_UPDATED: &str = "Text updated";
pub const TEXT_DELETED: &str = "Text deleted";

/// Body of `POST /texts` and `PUT /texts/{id}`.
#[derive(Debug, Deserialize)]
pub struct TextBody {
    pub text: String,
}

pub fn text_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/texts",
            get(list_texts).post(create_text).put(create_text_plain),
        )
        .route("/texts/{id}", put(update_text).delete(delete_text))
}

async fn list_texts(State(state): State<AppState>) -> Result<Json<Vec<Note>>, AppError> {
    Ok(Json(state.store.list_all().await?))
}

async fn create_text(
    State(state): State<AppState>,
    body: Result<Json<TextBody>, JsonRejection>,
) -> Result<(StatusCode, &'static str), AppError> {
    let Json(body) = body?;
    state.store.create(body.text).await?;
    Ok((StatusCode::CREATED, TEXT_CREATED))
}

/// Legacy create: the whole plain-text body is the note.
async fn create_text_plain(
    State(state): State<AppState>,
    body: Result<String, StringRejection>,
) -> Result<(StatusCode, &'static str), AppError> {
    let body = body?;
    state.store.create(body).await?;
    Ok((StatusCode::CREATED, TEXT_CREATED))
}

async fn update_text(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<TextBody>, JsonRejection>,
) -> Result<&'static str, AppError> {
    let Path(id) = id?;
    let Json(body) = body?;
    state.store.update(id, body.text).await?;
    Ok(TEXT_UPDATED)
}

async fn delete_text(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<&'static str, AppError> {
    let Path(id) = id?;
    state.store.delete(id).await?;
    Ok(TEXT_DELETED)
}
