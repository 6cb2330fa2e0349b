pub mod api;
pub mod middleware;
mod public;

pub use api::build_api_router;
pub use public::build_router;

use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
};

use crate::application::{notes_api::NotesApi, prefetch::NotesPrefetcher, query::NotesQuery};
use crate::cache::{CacheConfig, QueryCache};

use self::middleware::{log_failures, trace_requests};

/// Shared state behind every route.
#[derive(Clone)]
pub struct HttpState {
    pub api: Arc<dyn NotesApi>,
    /// Long-lived cache read by the JSON reader and invalidated by creations.
    pub cache: Arc<QueryCache>,
    pub query: NotesQuery,
    pub prefetcher: NotesPrefetcher,
    /// Sizing for the throwaway cache each page render prefetches into.
    pub prefetch_cache: CacheConfig,
}

impl HttpState {
    pub fn new(api: Arc<dyn NotesApi>, cache: CacheConfig) -> Self {
        let query = NotesQuery::new(api.clone());
        Self {
            api,
            cache: Arc::new(QueryCache::new(&cache)),
            prefetcher: NotesPrefetcher::new(query.clone()),
            query,
            prefetch_cache: cache,
        }
    }
}

/// Full application router: HTML pages, the JSON API and request logging.
pub fn build_app(state: HttpState) -> Router {
    build_router()
        .merge(build_api_router())
        .with_state(state)
        .layer(axum_middleware::from_fn(log_failures))
        .layer(axum_middleware::from_fn(trace_requests))
}

async fn health() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
