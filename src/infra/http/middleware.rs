//! Request tracing and failure logging layers.

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, error, info_span, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Run the request inside a `request` span carrying a fresh id, and echo the
/// id back to the caller.
pub async fn trace_requests(request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Log 4xx/5xx responses with whatever [`ErrorReport`] the handler attached.
///
/// Runs inside the request span, so id, method and path come from there.
pub async fn log_failures(request: Request<Body>, next: Next) -> Response {
    let query = request.uri().query().map(str::to_string);
    let start = Instant::now();

    let mut response = next.run(request).await;
    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let elapsed_ms = start.elapsed().as_millis();
    let (source, chain) = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => (report.source, report.messages),
        None => ("unknown", Vec::new()),
    };
    let detail = chain.first().map(String::as_str).unwrap_or("no diagnostic");
    let query = query.as_deref().unwrap_or("");

    if status.is_server_error() {
        error!(
            target = "notehub::http::response",
            status = status.as_u16(),
            query,
            elapsed_ms,
            source,
            detail,
            chain = ?chain,
            "request failed",
        );
    } else {
        warn!(
            target = "notehub::http::response",
            status = status.as_u16(),
            query,
            elapsed_ms,
            source,
            detail,
            chain = ?chain,
            "request rejected",
        );
    }

    response
}
