//! Wire types shared between the notehub server and the notes backend.
//!
//! Field names follow the backend's camelCase JSON.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Number of notes requested per list page.
pub const NOTES_PER_PAGE: u32 = 12;

/// Category a note belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteTag {
    Todo,
    Work,
    Personal,
    Meeting,
    Shopping,
}

impl NoteTag {
    pub const ALL: [NoteTag; 5] = [
        NoteTag::Todo,
        NoteTag::Work,
        NoteTag::Personal,
        NoteTag::Meeting,
        NoteTag::Shopping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NoteTag::Todo => "Todo",
            NoteTag::Work => "Work",
            NoteTag::Personal => "Personal",
            NoteTag::Meeting => "Meeting",
            NoteTag::Shopping => "Shopping",
        }
    }
}

impl fmt::Display for NoteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown note tag `{}`", self.0)
    }
}

impl std::error::Error for UnknownTag {}

impl FromStr for NoteTag {
    type Err = UnknownTag;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        NoteTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == value)
            .ok_or_else(|| UnknownTag(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub tag: NoteTag,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// One page of notes as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesPage {
    pub notes: Vec<Note>,
    pub total_pages: u32,
}

/// Query parameters of the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchNotesParams {
    pub page: u32,
    pub per_page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Body of the creation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNoteData {
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_parses_only_exact_names() {
        assert_eq!("Shopping".parse::<NoteTag>(), Ok(NoteTag::Shopping));
        assert!("shopping".parse::<NoteTag>().is_err());
        assert!("".parse::<NoteTag>().is_err());
    }

    #[test]
    fn fetch_params_omit_absent_tag() {
        let params = FetchNotesParams {
            page: 1,
            per_page: NOTES_PER_PAGE,
            tag: None,
        };
        let json = serde_json::to_value(&params).expect("serialize params");
        assert_eq!(json, serde_json::json!({ "page": 1, "perPage": 12 }));
    }

    #[test]
    fn notes_page_reads_backend_shape() {
        let body = r#"{
            "notes": [{
                "id": "n1",
                "title": "Buy milk",
                "content": "",
                "tag": "Shopping",
                "createdAt": "2024-05-01T10:00:00Z",
                "updatedAt": "2024-05-01T10:00:00Z"
            }],
            "totalPages": 3
        }"#;

        let page: NotesPage = serde_json::from_str(body).expect("decode page");
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.notes[0].tag, NoteTag::Shopping);
        assert!(page.notes[0].created_at.is_some());
    }

    #[test]
    fn note_timestamps_are_optional() {
        let note: Note =
            serde_json::from_str(r#"{"id":"n2","title":"Standup","tag":"Meeting"}"#)
                .expect("decode note");
        assert_eq!(note.content, "");
        assert!(note.updated_at.is_none());
    }
}
