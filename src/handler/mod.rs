//! Request handler module
//!
//! Responsible for turning one hyper request into one JSON response through
//! the router and the matched controller.

pub mod dispatch;

// Re-export main entry point
pub use dispatch::handle_request;
