//! Logger module
//!
//! Provides logging utilities for the REST server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Service and request error logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use hyper::StatusCode;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("REST server started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    write_info(&format!("Max body size: {} bytes", config.http.max_body_size));
    if let Some(max) = config.performance.max_connections {
        write_info(&format!("Max connections: {max}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================");
}

pub fn log_route(method: &str, pattern: &str, operation: &str) {
    write_info(&format!("[Route] {method:<7} {pattern} -> {operation}"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Raised service error, logged with its status before it is answered
pub fn log_service_error(operation: &str, status: StatusCode, err: &impl std::fmt::Debug) {
    write_error(&format!(
        "[SERVICE] {operation} failed with {}: {err:?}",
        status.as_u16()
    ));
}

pub fn log_dispatch(method: &str, path: &str, operation: &str) {
    write_info(&format!("[Dispatch] {method} {path} -> {operation}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_shutdown_requested(active: usize) {
    write_info(&format!(
        "[Shutdown] Stopped accepting, waiting for {active} active connection(s)"
    ));
}

pub fn log_shutdown_complete() {
    write_info("[Shutdown] Server stopped");
}
