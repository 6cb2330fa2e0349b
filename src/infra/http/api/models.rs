use serde::Deserialize;

use crate::domain::validation::NoteDraft;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NotesListQuery {
    pub tag: Option<String>,
    pub page: Option<u32>,
}

/// Creation payload. Missing fields are left blank so validation can report them.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    pub tag: String,
}

impl From<CreateNoteRequest> for NoteDraft {
    fn from(request: CreateNoteRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
            tag: request.tag,
        }
    }
}
