use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;

use crate::{
    application::{
        error::{ErrorReport, HttpError},
        form::{NoteForm, SubmitOutcome},
    },
    cache::QueryCache,
    domain::{notes::ALL_TAGS_SEGMENT, validation::NoteDraft},
    presentation::views::{
        NoteFormTemplate, NoteFormView, NotesListView, NotesPageTemplate, render_error_page,
        render_not_found_response, render_template_response,
    },
};

use super::{HttpState, health};

const ALL_NOTES_PATH: &str = "/notes/filter/all";

pub fn build_router() -> Router<HttpState> {
    Router::new()
        .route("/", get(home))
        .route("/notes", get(home))
        .route("/notes/filter", get(all_notes))
        .route("/notes/filter/", get(all_notes))
        .route("/notes/filter/{*slug}", get(notes_by_tag))
        .route(
            "/notes/action/create",
            get(create_note_form).post(submit_note_form),
        )
        .route("/_health", get(health))
        .fallback(fallback)
}

async fn home() -> Redirect {
    Redirect::to(ALL_NOTES_PATH)
}

async fn fallback() -> Response {
    render_not_found_response()
}

async fn all_notes(State(state): State<HttpState>) -> Response {
    render_notes_page(&state, ALL_TAGS_SEGMENT).await
}

async fn notes_by_tag(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    render_notes_page(&state, first_segment(&slug)).await
}

/// Only the first path segment selects the filter; a missing one means `all`.
fn first_segment(slug: &str) -> &str {
    slug.split('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(ALL_TAGS_SEGMENT)
}

async fn render_notes_page(state: &HttpState, segment: &str) -> Response {
    let request_cache = QueryCache::new(&state.prefetch_cache);
    let prefetched = match state.prefetcher.prefetch(segment, &request_cache).await {
        Ok(prefetched) => prefetched,
        Err(err) => return render_error_page(HttpError::from(err), "Notes unavailable"),
    };

    state.cache.hydrate(&prefetched.state);

    // A stale shared entry means a mutation landed after this read began;
    // render what this request fetched instead.
    let page = state
        .cache
        .peek(&prefetched.key)
        .filter(|entry| !entry.stale)
        .map(|entry| entry.data)
        .or_else(|| {
            prefetched
                .state
                .find(&prefetched.key)
                .map(|query| query.data.clone())
        });
    let Some(page) = page else {
        return HttpError::new(
            "infra::http::public::render_notes_page",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Notes could not be rendered",
            "prefetched page missing from snapshot",
        )
        .into_response();
    };

    let snapshot = match prefetched.state.to_script_json() {
        Ok(json) => json,
        Err(err) => {
            return HttpError::from_error(
                "infra::http::public::render_notes_page",
                StatusCode::INTERNAL_SERVER_ERROR,
                "Notes could not be rendered",
                &err,
            )
            .into_response();
        }
    };

    let view = NotesListView::new(&prefetched.filter, &page, snapshot);
    render_template_response(NotesPageTemplate { view }, StatusCode::OK)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NoteFormInput {
    intent: Option<String>,
    title: String,
    content: String,
    tag: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormIntent {
    Create,
    Cancel,
}

impl FormIntent {
    fn parse(value: Option<&str>) -> Option<Self> {
        match value.unwrap_or("create") {
            "create" => Some(Self::Create),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

async fn create_note_form() -> Response {
    render_form(&NoteForm::new(), StatusCode::OK)
}

async fn submit_note_form(
    State(state): State<HttpState>,
    Form(input): Form<NoteFormInput>,
) -> Response {
    let Some(intent) = FormIntent::parse(input.intent.as_deref()) else {
        return HttpError::new(
            "infra::http::public::submit_note_form",
            StatusCode::BAD_REQUEST,
            "Unknown form action",
            format!("unsupported intent `{}`", input.intent.unwrap_or_default()),
        )
        .into_response();
    };

    let mut form = NoteForm::from_draft(NoteDraft {
        title: input.title,
        content: input.content,
        tag: input.tag,
    });

    if intent == FormIntent::Cancel {
        return match form.cancel() {
            Ok(()) => Redirect::to(ALL_NOTES_PATH).into_response(),
            Err(err) => HttpError::from_error(
                "infra::http::public::submit_note_form",
                StatusCode::CONFLICT,
                "Form can no longer be cancelled",
                &err,
            )
            .into_response(),
        };
    }

    match form.submit(state.api.as_ref(), &state.cache).await {
        SubmitOutcome::Created(_) => Redirect::to(ALL_NOTES_PATH).into_response(),
        SubmitOutcome::Invalid(errors) => {
            let mut response = render_form(&form, StatusCode::UNPROCESSABLE_ENTITY);
            ErrorReport::from_message(
                "infra::http::public::submit_note_form",
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("{} invalid field(s)", errors.len()),
            )
            .attach(&mut response);
            response
        }
        SubmitOutcome::Failed(err) => {
            let http = HttpError::from(err);
            let mut response = render_form(&form, http.status());
            http.into_report().attach(&mut response);
            response
        }
        SubmitOutcome::Rejected(phase) => HttpError::new(
            "infra::http::public::submit_note_form",
            StatusCode::CONFLICT,
            "Form is not accepting submissions",
            format!("form phase {phase:?}"),
        )
        .into_response(),
    }
}

fn render_form(form: &NoteForm, status: StatusCode) -> Response {
    let view = NoteFormView::from(form);
    render_template_response(NoteFormTemplate { view }, status)
}
