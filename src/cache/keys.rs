//! Query cache key definitions.

use serde::{Deserialize, Serialize};

use crate::domain::notes::NoteQuery;

/// Kind of resource a cached query belongs to; invalidation works per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Notes,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Notes => "notes",
        }
    }
}

/// Ordered `(kind, tag-or-absent, page)` key.
///
/// Serializes as a JSON array, e.g. `["notes", null, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    from = "(ResourceKind, Option<String>, u32)",
    into = "(ResourceKind, Option<String>, u32)"
)]
pub struct QueryKey {
    pub kind: ResourceKind,
    pub tag: Option<String>,
    pub page: u32,
}

impl QueryKey {
    pub fn notes(query: &NoteQuery) -> Self {
        Self {
            kind: ResourceKind::Notes,
            tag: query.tag.tag().map(str::to_string),
            page: query.page.get(),
        }
    }
}

impl From<(ResourceKind, Option<String>, u32)> for QueryKey {
    fn from((kind, tag, page): (ResourceKind, Option<String>, u32)) -> Self {
        Self { kind, tag, page }
    }
}

impl From<QueryKey> for (ResourceKind, Option<String>, u32) {
    fn from(key: QueryKey) -> Self {
        (key.kind, key.tag, key.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notes::TagFilter;

    #[test]
    fn equal_tag_and_page_give_equal_keys() {
        let a = NoteQuery::new(TagFilter::from_segment("Work"), 2).expect("query");
        let b = NoteQuery::new(TagFilter::from_optional(Some("Work")), 2).expect("query");
        assert_eq!(QueryKey::notes(&a), QueryKey::notes(&b));
    }

    #[test]
    fn all_maps_to_absent_tag_component() {
        let key = QueryKey::notes(&NoteQuery::first_page(TagFilter::from_segment("all")));
        assert_eq!(key.tag, None);
        assert_eq!(key.page, 1);
    }

    #[test]
    fn key_serializes_as_tuple() {
        let key = QueryKey {
            kind: ResourceKind::Notes,
            tag: Some("Todo".to_string()),
            page: 1,
        };
        let json = serde_json::to_value(&key).expect("serialize key");
        assert_eq!(json, serde_json::json!(["notes", "Todo", 1]));

        let back: QueryKey = serde_json::from_value(json).expect("deserialize key");
        assert_eq!(back, key);
    }
}
