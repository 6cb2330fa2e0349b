//! Port to the backend notes service.

use async_trait::async_trait;
use notehub_api_types::{CreateNoteData, FetchNotesParams, Note, NotesPage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

/// A note list fetch failed.
#[derive(Debug, Error)]
#[error("failed to fetch notes")]
pub struct FetchError(#[source] pub ApiError);

/// A note creation request failed.
#[derive(Debug, Error)]
#[error("failed to create note")]
pub struct SubmissionError(#[source] pub ApiError);

#[async_trait]
pub trait NotesApi: Send + Sync {
    async fn fetch_notes(&self, params: &FetchNotesParams) -> Result<NotesPage, ApiError>;

    async fn create_note(&self, data: &CreateNoteData) -> Result<Note, ApiError>;
}
