use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use notehub_api_types::NotesPage;

use crate::application::error::backend_status;
use crate::application::form::{NoteForm, SubmitOutcome};
use crate::domain::notes::{NoteQuery, TagFilter};

use super::error::{ApiError, ValidationErrorBody};
use super::models::{CreateNoteRequest, NotesListQuery};
use crate::infra::http::HttpState;

pub async fn list_notes(
    State(state): State<HttpState>,
    Query(query): Query<NotesListQuery>,
) -> Result<Json<NotesPage>, ApiError> {
    let filter = TagFilter::from_optional(query.tag.as_deref());
    let request = NoteQuery::new(filter, query.page.unwrap_or(1))
        .map_err(|err| ApiError::bad_request("invalid page", Some(err.to_string())))?;

    let page = state
        .query
        .ensure(&state.cache, &request)
        .await
        .map_err(|err| {
            ApiError::upstream(backend_status(&err.0), "Notes could not be loaded", &err)
        })?;

    Ok(Json(page))
}

pub async fn create_note(
    State(state): State<HttpState>,
    Json(payload): Json<CreateNoteRequest>,
) -> Response {
    let mut form = NoteForm::from_draft(payload.into());

    match form.submit(state.api.as_ref(), &state.cache).await {
        SubmitOutcome::Created(note) => (StatusCode::CREATED, Json(note)).into_response(),
        SubmitOutcome::Invalid(errors) => ValidationErrorBody {
            errors: errors.messages(),
        }
        .into_response(),
        SubmitOutcome::Failed(err) => {
            ApiError::upstream(backend_status(&err.0), "Note could not be created", &err)
                .into_response()
        }
        SubmitOutcome::Rejected(phase) => {
            ApiError::conflict("form is not accepting submissions", Some(format!("{phase:?}")))
                .into_response()
        }
    }
}
