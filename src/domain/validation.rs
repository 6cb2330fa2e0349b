//! Field rules for note creation.

use std::collections::BTreeMap;

use notehub_api_types::{CreateNoteData, NoteTag};
use serde::Serialize;

// Lengths are UTF-16 code units, the unit browsers count in.
pub const TITLE_MIN_LEN: usize = 3;
pub const TITLE_MAX_LEN: usize = 50;
pub const CONTENT_MAX_LEN: usize = 500;

fn text_len(value: &str) -> usize {
    value.encode_utf16().count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteField {
    Title,
    Content,
    Tag,
}

impl NoteField {
    pub const ALL: [NoteField; 3] = [NoteField::Title, NoteField::Content, NoteField::Tag];

    pub fn as_str(self) -> &'static str {
        match self {
            NoteField::Title => "title",
            NoteField::Content => "content",
            NoteField::Tag => "tag",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    TooShort,
    TooLong,
    NotAllowed,
}

impl FieldError {
    pub fn message(self, field: NoteField) -> &'static str {
        match (field, self) {
            (NoteField::Title, FieldError::Required) => "Title is required",
            (NoteField::Title, FieldError::TooShort) => "Title is too short",
            (NoteField::Title, _) => "Title is too long",
            (NoteField::Content, _) => "Content must be at most 500 symbols",
            (NoteField::Tag, FieldError::Required) => "Tag is required",
            (NoteField::Tag, _) => "Tag must be one of: Todo, Work, Personal, Meeting, Shopping",
        }
    }
}

/// Per-field validation failures, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<NoteField, FieldError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: NoteField) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    pub fn message(&self, field: NoteField) -> Option<&'static str> {
        self.get(field).map(|error| error.message(field))
    }

    pub fn set(&mut self, field: NoteField, error: Option<FieldError>) {
        match error {
            Some(error) => {
                self.0.insert(field, error);
            }
            None => {
                self.0.remove(&field);
            }
        }
    }

    pub fn contains(&self, field: NoteField) -> bool {
        self.0.contains_key(&field)
    }

    /// Field name → message, for JSON responses.
    pub fn messages(&self) -> BTreeMap<&'static str, &'static str> {
        self.0
            .iter()
            .map(|(field, error)| (field.as_str(), error.message(*field)))
            .collect()
    }
}

/// Raw form input, tag still unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tag: String,
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tag: NoteTag::Todo.as_str().to_string(),
        }
    }
}

impl NoteDraft {
    pub fn value(&self, field: NoteField) -> &str {
        match field {
            NoteField::Title => &self.title,
            NoteField::Content => &self.content,
            NoteField::Tag => &self.tag,
        }
    }
}

/// Check a single field of the draft.
pub fn validate_field(draft: &NoteDraft, field: NoteField) -> Option<FieldError> {
    match field {
        NoteField::Title => {
            let len = text_len(&draft.title);
            if draft.title.is_empty() {
                Some(FieldError::Required)
            } else if len < TITLE_MIN_LEN {
                Some(FieldError::TooShort)
            } else if len > TITLE_MAX_LEN {
                Some(FieldError::TooLong)
            } else {
                None
            }
        }
        NoteField::Content => {
            (text_len(&draft.content) > CONTENT_MAX_LEN).then_some(FieldError::TooLong)
        }
        NoteField::Tag => {
            if draft.tag.is_empty() {
                Some(FieldError::Required)
            } else if draft.tag.parse::<NoteTag>().is_err() {
                Some(FieldError::NotAllowed)
            } else {
                None
            }
        }
    }
}

/// Check every field, collecting all failures.
pub fn validate(draft: &NoteDraft) -> Result<CreateNoteData, FieldErrors> {
    let mut errors = FieldErrors::default();
    for field in NoteField::ALL {
        errors.set(field, validate_field(draft, field));
    }

    match draft.tag.parse::<NoteTag>() {
        Ok(tag) if errors.is_empty() => Ok(CreateNoteData {
            title: draft.title.clone(),
            content: draft.content.clone(),
            tag,
        }),
        _ => Err(errors),
    }
}
