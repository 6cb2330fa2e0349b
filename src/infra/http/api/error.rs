use std::collections::BTreeMap;
use std::error::Error as StdError;

use crate::application::error::ErrorReport;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const CONFLICT: &str = "conflict";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const UPSTREAM: &str = "upstream_error";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
    chain: Vec<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
            chain: Vec::new(),
        }
    }

    pub fn bad_request(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn conflict(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::CONFLICT, codes::CONFLICT, message, hint)
    }

    /// A failure of the notes backend; the source chain is logged, not returned.
    pub fn upstream(status: StatusCode, message: &'static str, error: &dyn StdError) -> Self {
        let report = ErrorReport::from_error("infra::http::api", status, error);
        Self {
            status,
            code: codes::UPSTREAM,
            message,
            hint: None,
            chain: report.messages,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = match (self.chain.is_empty(), self.hint.as_deref()) {
            (false, _) => self.chain.clone(),
            (true, Some(hint)) => vec![format!("{}: {hint}", self.code)],
            (true, None) => vec![format!("{}: {}", self.code, self.message)],
        };
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport {
            source: "infra::http::api",
            status: self.status,
            messages: detail,
        }
        .attach(&mut response);
        response
    }
}

/// Per-field validation messages returned with 422.
#[derive(Debug, Serialize)]
pub struct ValidationErrorBody {
    pub errors: BTreeMap<&'static str, &'static str>,
}

impl IntoResponse for ValidationErrorBody {
    fn into_response(self) -> Response {
        let summary = format!("{}: {} invalid field(s)", codes::INVALID_INPUT, self.errors.len());
        let mut response = (StatusCode::UNPROCESSABLE_ENTITY, Json(self)).into_response();
        ErrorReport::from_message(
            "infra::http::api",
            StatusCode::UNPROCESSABLE_ENTITY,
            summary,
        )
        .attach(&mut response);
        response
    }
}
