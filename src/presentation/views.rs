use crate::application::error::{ErrorReport, HttpError};
use crate::application::form::NoteForm;
use crate::domain::notes::TagFilter;
use crate::domain::validation::NoteField;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use notehub_api_types::{Note, NoteTag, NotesPage};
use thiserror::Error;
use time::{format_description::BorrowedFormatItem, macros::format_description};

pub const CREATE_NOTE_PATH: &str = "/notes/action/create";

const NOTE_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response() -> Response {
    let view = ErrorPageView {
        title: "Page not found".to_string(),
        message: "The page you are looking for does not exist.".to_string(),
    };
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// Render an error page for `error`, keeping its status and diagnostic report.
pub fn render_error_page(error: HttpError, title: &str) -> Response {
    let status = error.status();
    let view = ErrorPageView {
        title: title.to_string(),
        message: error.public_message().to_string(),
    };
    let mut response = render_template_response(ErrorTemplate { view }, status);
    error.into_report().attach(&mut response);
    response
}

#[derive(Clone)]
pub struct ErrorPageView {
    pub title: String,
    pub message: String,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: ErrorPageView,
}

#[derive(Clone)]
pub struct TagLinkView {
    pub label: String,
    pub href: String,
    pub active: bool,
}

impl TagLinkView {
    /// Sidebar links: "All notes" followed by every known tag.
    pub fn navigation(active: &TagFilter) -> Vec<Self> {
        let all = TagFilter::All;
        let mut links = vec![Self {
            label: "All notes".to_string(),
            href: all.base_path(),
            active: *active == all,
        }];
        links.extend(NoteTag::ALL.iter().map(|tag| {
            let filter = TagFilter::Tag(tag.as_str().to_string());
            Self {
                label: tag.as_str().to_string(),
                href: filter.base_path(),
                active: *active == filter,
            }
        }));
        links
    }
}

#[derive(Clone)]
pub struct NoteCardView {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tag: String,
    pub created_at: Option<String>,
}

impl From<&Note> for NoteCardView {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
            tag: note.tag.as_str().to_string(),
            created_at: note
                .created_at
                .and_then(|at| at.format(NOTE_DATE_FORMAT).ok()),
        }
    }
}

#[derive(Clone)]
pub struct NotesListView {
    pub heading: String,
    pub tags: Vec<TagLinkView>,
    pub notes: Vec<NoteCardView>,
    pub total_pages: u32,
    pub create_href: &'static str,
    /// Dehydrated cache state, already escaped for a `<script>` element.
    pub snapshot_json: String,
}

impl NotesListView {
    pub fn new(filter: &TagFilter, page: &NotesPage, snapshot_json: String) -> Self {
        let heading = match filter.tag() {
            Some(tag) => format!("{tag} notes"),
            None => "All notes".to_string(),
        };
        Self {
            heading,
            tags: TagLinkView::navigation(filter),
            notes: page.notes.iter().map(NoteCardView::from).collect(),
            total_pages: page.total_pages,
            create_href: CREATE_NOTE_PATH,
            snapshot_json,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

#[derive(Template)]
#[template(path = "notes/list.html")]
pub struct NotesPageTemplate {
    pub view: NotesListView,
}

#[derive(Clone)]
pub struct TagOptionView {
    pub value: &'static str,
    pub selected: bool,
}

#[derive(Clone)]
pub struct NoteFormView {
    pub action: &'static str,
    pub title: String,
    pub content: String,
    pub tag_options: Vec<TagOptionView>,
    pub title_error: Option<&'static str>,
    pub content_error: Option<&'static str>,
    pub tag_error: Option<&'static str>,
    pub submit_label: &'static str,
    pub submit_disabled: bool,
}

impl From<&NoteForm> for NoteFormView {
    fn from(form: &NoteForm) -> Self {
        let draft = form.draft();
        let errors = form.errors();
        Self {
            action: CREATE_NOTE_PATH,
            title: draft.title.clone(),
            content: draft.content.clone(),
            tag_options: NoteTag::ALL
                .iter()
                .map(|tag| TagOptionView {
                    value: tag.as_str(),
                    selected: tag.as_str() == draft.tag,
                })
                .collect(),
            title_error: errors.message(NoteField::Title),
            content_error: errors.message(NoteField::Content),
            tag_error: errors.message(NoteField::Tag),
            submit_label: form.submit_label(),
            submit_disabled: form.submit_disabled(),
        }
    }
}

#[derive(Template)]
#[template(path = "notes/form.html")]
pub struct NoteFormTemplate {
    pub view: NoteFormView,
}
