pub mod error;
pub mod handlers;
pub mod models;

use axum::{Router, routing::get};

use super::HttpState;

pub fn build_api_router() -> Router<HttpState> {
    Router::new().route(
        "/api/notes",
        get(handlers::list_notes).post(handlers::create_note),
    )
}
