//! HTTP response building module
//!
//! Turns resolved responses into hyper responses: JSON body, `Server` header,
//! optional CORS headers.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW};
use hyper::{Method, Response, StatusCode};

use crate::config::HttpConfig;
use crate::controller::ResolvedResponse;

const ALLOWED_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";

/// Serialize a resolved response
pub fn build_json_response(resolved: &ResolvedResponse, http: &HttpConfig) -> Response<Full<Bytes>> {
    let body = match resolved.to_bytes() {
        Ok(body) => body,
        Err(e) => {
            log_build_error("JSON", &e);
            return build_internal_error(http);
        }
    };

    let mut builder = Response::builder()
        .status(resolved.status())
        .header("Server", &http.server_name);
    if !body.is_empty() {
        builder = builder.header("Content-Type", "application/json");
    }
    if http.enable_cors {
        builder = builder.header("Access-Control-Allow-Origin", "*");
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(resolved.status().as_str(), &e);
        build_internal_error(http)
    })
}

/// Set the `Allow` header listing the methods a path accepts
pub fn with_allow_header(mut response: Response<Full<Bytes>>, allow: &[Method]) -> Response<Full<Bytes>> {
    let value = allow
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    match HeaderValue::from_str(&value) {
        Ok(v) => {
            response.headers_mut().insert(ALLOW, v);
        }
        Err(e) => crate::logger::log_error(&format!("Invalid Allow header '{value}': {e}")),
    }
    response
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Server", &http.server_name)
        .header("Allow", ALLOWED_METHODS);

    if http.enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Last-resort 500 with a static body
fn build_internal_error(http: &HttpConfig) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header("Server", &http.server_name)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from_static(
            br#"{"error":"Internal server error"}"#,
        )))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

/// Log response build error
fn log_build_error(status: &str, error: &impl std::fmt::Display) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
