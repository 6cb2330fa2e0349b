use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use notehub_api_types::{CreateNoteData, FetchNotesParams, Note, NoteTag, NotesPage};

use super::notes_api::{ApiError, NotesApi};

/// Records every call and answers from canned data.
#[derive(Default)]
pub(crate) struct RecordingApi {
    pub fetches: Mutex<Vec<FetchNotesParams>>,
    pub creates: Mutex<Vec<CreateNoteData>>,
    pub fail_fetch: AtomicBool,
    pub fail_create: AtomicBool,
}

impl RecordingApi {
    pub fn failing_create() -> Self {
        let api = Self::default();
        api.fail_create.store(true, Ordering::SeqCst);
        api
    }

    pub fn failing_fetch() -> Self {
        let api = Self::default();
        api.fail_fetch.store(true, Ordering::SeqCst);
        api
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().expect("fetches lock").len()
    }

    pub fn create_count(&self) -> usize {
        self.creates.lock().expect("creates lock").len()
    }
}

#[async_trait]
impl NotesApi for RecordingApi {
    async fn fetch_notes(&self, params: &FetchNotesParams) -> Result<NotesPage, ApiError> {
        let call = {
            let mut fetches = self.fetches.lock().expect("fetches lock");
            fetches.push(params.clone());
            fetches.len()
        };
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }

        let tag = params
            .tag
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or(NoteTag::Todo);
        Ok(NotesPage {
            notes: vec![Note {
                id: format!("fetch-{call}"),
                title: format!("Note from fetch {call}"),
                content: String::new(),
                tag,
                created_at: None,
                updated_at: None,
            }],
            total_pages: 2,
        })
    }

    async fn create_note(&self, data: &CreateNoteData) -> Result<Note, ApiError> {
        self.creates.lock().expect("creates lock").push(data.clone());
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(Note {
            id: "created-1".to_string(),
            title: data.title.clone(),
            content: data.content.clone(),
            tag: data.tag,
            created_at: None,
            updated_at: None,
        })
    }
}
