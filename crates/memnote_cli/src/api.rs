//! Typed client for the `/texts` HTTP API.

use memnote_core::{Note, NoteId};
use reqwest::{header, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("server responded {status}: {message}")]
    Status { status: StatusCode, message: String },
}

#[derive(Serialize)]
struct TextBody<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct NotesApi {
    client: Client,
    base_url: String,
}

impl NotesApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list(&self) -> Result<Vec<Note>, ApiError> {
        let response = self.client.get(self.texts_url()).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    /// Creates a note through `POST /texts`. Returns the confirmation text.
    pub async fn create(&self, text: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.texts_url())
            .json(&TextBody { text })
            .send()
            .await?;
        confirmation(response).await
    }

    /// Creates a note through the legacy plain-text `PUT /texts`.
    pub async fn create_plain(&self, text: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .put(self.texts_url())
            .header(header::CONTENT_TYPE, "text/plain")
            .body(text.to_string())
            .send()
            .await?;
        confirmation(response).await
    }

    pub async fn update(&self, id: NoteId, text: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .put(self.note_url(id))
            .json(&TextBody { text })
            .send()
            .await?;
        confirmation(response).await
    }

    pub async fn delete(&self, id: NoteId) -> Result<String, ApiError> {
        let response = self.client.delete(self.note_url(id)).send().await?;
        confirmation(response).await
    }

    fn texts_url(&self) -> String {
        format!("{}/texts", self.base_url)
    }

    fn note_url(&self, id: NoteId) -> String {
        format!("{}/texts/{id}", self.base_url)
    }
}

async fn confirmation(response: Response) -> Result<String, ApiError> {
    Ok(check_status(response).await?.text().await?)
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|parsed| parsed.error)
        .unwrap_or(body);
    Err(ApiError::Status { status, message })
}

#[cfg(test)]
mod tests {
    use super::NotesApi;
    use memnote_core::NoteId;

    #[test]
    fn base_url_drops_trailing_slashes() {
        let api = NotesApi::new("http://localhost:9000//");
        assert_eq!(api.base_url(), "http://localhost:9000");
        assert_eq!(api.texts_url(), "http://localhost:9000/texts");
    }

    #[test]
    fn note_url_uses_hyphenated_id() {
        let api = NotesApi::new("http://localhost:9000");
        let id = NoteId::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        assert_eq!(
            api.note_url(id),
            "http://localhost:9000/texts/67e55044-10b1-426f-9247-bb680e5fe0c8"
        );
    }
}
