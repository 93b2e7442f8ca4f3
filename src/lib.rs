//! JSON REST controller toolkit on hyper.
//!
//! A request is routed to a controller, its query, form, JSON body and
//! route parameters are merged into one input map, the controller's
//! service runs the named operation, and the outcome is resolved into an
//! HTTP status and JSON body.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod handler;
pub mod http;
pub mod logger;
pub mod request;
pub mod routing;
pub mod server;
