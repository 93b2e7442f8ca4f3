//! Resolved responses
//!
//! A status code plus an optional JSON body, built once per request and then
//! serialized. The `respond_*` helpers are pure constructors for the common
//! REST outcomes.

use hyper::body::Bytes;
use hyper::StatusCode;
use serde_json::{json, Value};

pub const DEFAULT_NOT_FOUND_MESSAGE: &str = "Resource not found";
pub const DEFAULT_UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Status code and JSON body produced for one request
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedResponse {
    status: StatusCode,
    body: Option<Value>,
}

impl ResolvedResponse {
    pub const fn new(status: StatusCode, body: Option<Value>) -> Self {
        Self { status, body }
    }

    pub const fn json(status: StatusCode, body: Value) -> Self {
        Self::new(status, Some(body))
    }

    /// `{error: message}` with the given status
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Serialized body as sent on the wire
    ///
    /// Empty when there is no body or the status forbids one (204, 304).
    pub fn to_bytes(&self) -> Result<Bytes, serde_json::Error> {
        match &self.body {
            Some(body) if status_allows_body(self.status) => {
                serde_json::to_vec(body).map(Bytes::from)
            }
            _ => Ok(Bytes::new()),
        }
    }
}

fn status_allows_body(status: StatusCode) -> bool {
    !(status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED)
}

/// 201 Created with the body as given
pub const fn respond_created(body: Value) -> ResolvedResponse {
    ResolvedResponse::json(StatusCode::CREATED, body)
}

/// 204 No Content
pub const fn respond_no_content() -> ResolvedResponse {
    ResolvedResponse::new(StatusCode::NO_CONTENT, None)
}

/// 404 Not Found, `{error: message}`
pub fn respond_not_found(message: Option<&str>) -> ResolvedResponse {
    ResolvedResponse::error(
        StatusCode::NOT_FOUND,
        message.unwrap_or(DEFAULT_NOT_FOUND_MESSAGE),
    )
}

/// 401 Unauthorized, `{error: message}`
pub fn respond_unauthorized(message: Option<&str>) -> ResolvedResponse {
    ResolvedResponse::error(
        StatusCode::UNAUTHORIZED,
        message.unwrap_or(DEFAULT_UNAUTHORIZED_MESSAGE),
    )
}

/// 422 Unprocessable Entity, `{errors: errors}`
pub fn respond_validation_error(errors: Value) -> ResolvedResponse {
    ResolvedResponse::json(StatusCode::UNPROCESSABLE_ENTITY, json!({ "errors": errors }))
}
