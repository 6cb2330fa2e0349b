//! Reads note list pages through the query cache.

use std::sync::Arc;

use notehub_api_types::NotesPage;
use time::OffsetDateTime;
use tracing::debug;

use crate::cache::{QueryCache, QueryKey};
use crate::domain::notes::NoteQuery;

use super::notes_api::{FetchError, NotesApi};

#[derive(Clone)]
pub struct NotesQuery {
    api: Arc<dyn NotesApi>,
}

impl NotesQuery {
    pub fn new(api: Arc<dyn NotesApi>) -> Self {
        Self { api }
    }

    /// Fetch the page unconditionally and store it under the query's key.
    ///
    /// The entry is stamped with the time the fetch started, so an invalidation
    /// that lands while the request is in flight leaves it stale.
    pub async fn fetch(
        &self,
        cache: &QueryCache,
        query: &NoteQuery,
    ) -> Result<NotesPage, FetchError> {
        let key = QueryKey::notes(query);
        let started_at = OffsetDateTime::now_utc();
        let page = self
            .api
            .fetch_notes(&query.params())
            .await
            .map_err(FetchError)?;
        cache.insert_fetched(key, page.clone(), started_at);
        Ok(page)
    }

    /// Serve a fresh cached page, fetching when the entry is missing or stale.
    pub async fn ensure(
        &self,
        cache: &QueryCache,
        query: &NoteQuery,
    ) -> Result<NotesPage, FetchError> {
        let key = QueryKey::notes(query);
        if let Some(page) = cache.get_fresh(&key) {
            return Ok(page);
        }

        debug!(
            target = "notehub::query",
            tag = key.tag.as_deref().unwrap_or(""),
            page = key.page,
            "refetching notes page"
        );
        self.fetch(cache, query).await
    }
}
