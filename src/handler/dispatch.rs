//! Request dispatch module
//!
//! Entry point for HTTP request processing: preflight and size checks, route
//! matching, body buffering, controller dispatch and access logging.

use crate::config::{AppState, HttpConfig};
use crate::controller::{respond_not_found, ResolvedResponse};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::request::BufferedRequest;
use crate::routing::RouteMatch;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{CONTENT_LENGTH, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::rc::Rc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Rc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let (response, operation) = dispatch(req, &state).await;

    if state.config.logging.access_log {
        entry.operation = operation;
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route and resolve one request, returning the operation it ran (if any)
async fn dispatch<B>(req: Request<B>, state: &AppState) -> (Response<Full<Bytes>>, Option<String>)
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let http_config = &state.config.http;

    // 1. CORS preflight
    if req.method() == Method::OPTIONS {
        return (http::build_options_response(http_config), None);
    }

    // 2. Reject oversized bodies before reading them
    if let Some(resp) = check_body_size(&req, http_config) {
        return (resp, None);
    }

    // 3. Match route
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match state.router.resolve(&method, &path) {
        RouteMatch::NotFound => (
            http::build_json_response(&respond_not_found(None), http_config),
            None,
        ),
        RouteMatch::MethodNotAllowed { allow } => {
            let resolved = ResolvedResponse::error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
            let response = http::build_json_response(&resolved, http_config);
            (http::with_allow_header(response, &allow), None)
        }
        RouteMatch::Found {
            endpoint,
            operation,
            params,
        } => {
            if state.debug_logging() {
                logger::log_dispatch(method.as_str(), &path, operation);
            }

            // 4. Buffer body, then resolve through the controller
            let resolved = match BufferedRequest::from_request(req, http_config.body_limit()).await {
                Ok(request) => endpoint.handle(&request, operation, &params),
                Err(e) => {
                    logger::log_warning(&format!("{method} {path}: {e}"));
                    ResolvedResponse::error(e.status(), &e.to_string())
                }
            };

            (
                http::build_json_response(&resolved, http_config),
                Some(operation.to_string()),
            )
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, http_config: &HttpConfig) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > http_config.max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {})",
                    http_config.max_body_size
                ));
                let message = format!("Request body exceeds {} bytes", http_config.max_body_size);
                Some(http::build_json_response(
                    &ResolvedResponse::error(StatusCode::PAYLOAD_TOO_LARGE, &message),
                    http_config,
                ))
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
