//! Controller module
//!
//! Delegates normalized input to a service and resolves the outcome:
//! - Returned results: `errors` key → 400, otherwise the operation's success status
//! - Raised errors: classified by kind (400 / 500, unclassified → 400)
//! - Helper constructors for common REST responses

mod error;
mod resolver;
mod response;
mod service;
mod status;

pub use error::{status_for, ErrorKind, ServiceError, UNCLASSIFIED_ERROR_STATUS};
pub use resolver::{error_response, Controller, Endpoint};
pub use response::{
    respond_created, respond_no_content, respond_not_found, respond_unauthorized,
    respond_validation_error, ResolvedResponse, DEFAULT_NOT_FOUND_MESSAGE,
    DEFAULT_UNAUTHORIZED_MESSAGE,
};
pub use service::{parse_input, Service, ServiceResult, ERRORS_KEY};
pub use status::{SuccessStatusPolicy, SuccessStatuses};
