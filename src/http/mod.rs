//! HTTP protocol layer module
//!
//! Converts resolved responses into hyper responses, decoupled from the
//! controllers that produce them.

pub mod response;

// Re-export commonly used builders
pub use response::{build_json_response, build_options_response, with_allow_header};
