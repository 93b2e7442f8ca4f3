//! Routing module
//!
//! Provides REST routing capabilities including:
//! - Path patterns with `{name}` captures and trailing `*`
//! - Method-aware route tables with 404 / 405 outcomes
//! - Conventional resource registration

mod matcher;
mod router;

pub use matcher::PathPattern;
pub use router::{Route, RouteMatch, Router};
