//! Note list queries and the tag filter taken from the route.

use std::num::NonZeroU32;

use notehub_api_types::{FetchNotesParams, NOTES_PER_PAGE};

use super::error::DomainError;

/// Route segment that stands for "no tag filter".
pub const ALL_TAGS_SEGMENT: &str = "all";

/// Exact-match tag filter for the note list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagFilter {
    All,
    Tag(String),
}

impl TagFilter {
    /// Build a filter from a route segment or query value.
    ///
    /// Surrounding whitespace is trimmed; blank or `all` maps to
    /// [`TagFilter::All`] and every other value is kept as written.
    /// Prefetch and read paths must both go through here so their cache keys agree.
    pub fn from_segment(segment: &str) -> Self {
        let segment = segment.trim();
        if segment.is_empty() || segment == ALL_TAGS_SEGMENT {
            TagFilter::All
        } else {
            TagFilter::Tag(segment.to_string())
        }
    }

    /// Same as [`TagFilter::from_segment`], with a missing value meaning `all`.
    pub fn from_optional(value: Option<&str>) -> Self {
        value.map_or(TagFilter::All, Self::from_segment)
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            TagFilter::All => None,
            TagFilter::Tag(value) => Some(value.as_str()),
        }
    }

    /// Route segment used in links back to this filter.
    pub fn segment(&self) -> &str {
        self.tag().unwrap_or(ALL_TAGS_SEGMENT)
    }

    pub fn base_path(&self) -> String {
        format!("/notes/filter/{}", self.segment())
    }
}

/// A request for one page of the note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteQuery {
    pub tag: TagFilter,
    pub page: NonZeroU32,
}

impl NoteQuery {
    pub fn new(tag: TagFilter, page: u32) -> Result<Self, DomainError> {
        let page = NonZeroU32::new(page)
            .ok_or_else(|| DomainError::validation("page must be a positive integer"))?;
        Ok(Self { tag, page })
    }

    pub fn first_page(tag: TagFilter) -> Self {
        Self {
            tag,
            page: NonZeroU32::MIN,
        }
    }

    pub fn per_page(&self) -> u32 {
        NOTES_PER_PAGE
    }

    pub fn params(&self) -> FetchNotesParams {
        FetchNotesParams {
            page: self.page.get(),
            per_page: self.per_page(),
            tag: self.tag.tag().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_segment_means_no_filter() {
        assert_eq!(TagFilter::from_segment("all"), TagFilter::All);
        assert_eq!(TagFilter::from_segment("all").tag(), None);
    }

    #[test]
    fn other_segments_are_kept_verbatim() {
        for segment in ["Work", "work", "All", "unknown-tag"] {
            let filter = TagFilter::from_segment(segment);
            assert_eq!(filter.tag(), Some(segment));
        }
    }

    #[test]
    fn blank_optional_value_is_all() {
        assert_eq!(TagFilter::from_optional(None), TagFilter::All);
        assert_eq!(TagFilter::from_optional(Some("  ")), TagFilter::All);
        assert_eq!(
            TagFilter::from_optional(Some("Todo")),
            TagFilter::Tag("Todo".to_string())
        );
    }

    #[test]
    fn route_and_query_values_agree_after_trimming() {
        let from_route = TagFilter::from_segment(" Work ");
        assert_eq!(from_route, TagFilter::Tag("Work".to_string()));
        assert_eq!(from_route, TagFilter::from_optional(Some(" Work")));
        assert_eq!(
            NoteQuery::first_page(from_route).params(),
            NoteQuery::first_page(TagFilter::from_optional(Some("Work "))).params(),
        );
        assert_eq!(TagFilter::from_segment(" all "), TagFilter::All);
        assert_eq!(TagFilter::from_segment(""), TagFilter::All);
    }

    #[test]
    fn zero_page_is_rejected() {
        assert!(NoteQuery::new(TagFilter::All, 0).is_err());
        assert_eq!(NoteQuery::new(TagFilter::All, 3).expect("page").page.get(), 3);
    }

    #[test]
    fn params_carry_fixed_page_size_and_tag() {
        let query = NoteQuery::first_page(TagFilter::from_segment("Work"));
        let params = query.params();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 12);
        assert_eq!(params.tag.as_deref(), Some("Work"));

        let params = NoteQuery::first_page(TagFilter::All).params();
        assert!(params.tag.is_none());
    }
}
