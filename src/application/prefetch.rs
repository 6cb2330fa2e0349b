//! Server-side prefetch of the first list page for a tag filter.

use tracing::info;

use crate::cache::{DehydratedState, QueryCache, QueryKey};
use crate::domain::notes::{NoteQuery, TagFilter};

use super::notes_api::FetchError;
use super::query::NotesQuery;

#[derive(Debug, Clone)]
pub struct Prefetched {
    pub key: QueryKey,
    pub filter: TagFilter,
    pub state: DehydratedState,
}

#[derive(Clone)]
pub struct NotesPrefetcher {
    query: NotesQuery,
}

impl NotesPrefetcher {
    pub fn new(query: NotesQuery) -> Self {
        Self { query }
    }

    /// Fetch page 1 for the filter named by `segment` into `cache` and snapshot it.
    ///
    /// Always issues exactly one fetch; failures propagate without retry.
    pub async fn prefetch(
        &self,
        segment: &str,
        cache: &QueryCache,
    ) -> Result<Prefetched, FetchError> {
        let filter = TagFilter::from_segment(segment);
        let query = NoteQuery::first_page(filter.clone());
        let key = QueryKey::notes(&query);

        let page = self.query.fetch(cache, &query).await?;
        info!(
            target = "notehub::prefetch",
            tag = key.tag.as_deref().unwrap_or(""),
            notes = page.notes.len(),
            total_pages = page.total_pages,
            "prefetched notes page"
        );

        Ok(Prefetched {
            key,
            filter,
            state: cache.dehydrate(),
        })
    }
}
