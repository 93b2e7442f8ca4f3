// Service error classification
// Maps raised service errors to HTTP status codes

use hyper::StatusCode;
use thiserror::Error;

/// Error raised by a service operation
///
/// Only the `Display` text ever reaches the client.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller supplied bad input
    #[error("{0}")]
    InvalidArgument(String),

    /// Unexpected failure inside the service
    #[error("{0}")]
    Runtime(String),

    /// The service has no operation with this name
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Any other error a service chooses to propagate
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Error categories used for status mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Runtime,
    Unclassified,
}

/// Status for errors that match no entry of the status table
///
/// Unclassified errors are treated as client errors. This is kept for
/// compatibility with existing clients even though most APIs report unknown
/// failures as 500.
pub const UNCLASSIFIED_ERROR_STATUS: StatusCode = StatusCode::BAD_REQUEST;

/// Error kinds and their statuses, most specific first
const ERROR_STATUS_TABLE: &[(ErrorKind, StatusCode)] = &[
    (ErrorKind::InvalidArgument, StatusCode::BAD_REQUEST),
    (ErrorKind::Runtime, StatusCode::INTERNAL_SERVER_ERROR),
];

impl ServiceError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime(message.into())
    }

    pub fn other<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Other(error.into())
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Runtime(_) => ErrorKind::Runtime,
            Self::UnknownOperation(_) | Self::Other(_) => ErrorKind::Unclassified,
        }
    }

    /// HTTP status this error resolves to
    pub fn status(&self) -> StatusCode {
        status_for(self.kind())
    }
}

/// Input that fails to deserialize is the caller's fault
impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

/// Look up the status for an error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    ERROR_STATUS_TABLE
        .iter()
        .find(|(k, _)| *k == kind)
        .map_or(UNCLASSIFIED_ERROR_STATUS, |(_, status)| *status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("disk quota exceeded")]
    struct QuotaError;

    #[test]
    fn test_status_table() {
        assert_eq!(status_for(ErrorKind::InvalidArgument), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(ErrorKind::Runtime),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_for(ErrorKind::Unclassified), UNCLASSIFIED_ERROR_STATUS);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ServiceError::invalid_argument("bad").kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(ServiceError::runtime("boom").kind(), ErrorKind::Runtime);
        assert_eq!(
            ServiceError::UnknownOperation("archive".into()).kind(),
            ErrorKind::Unclassified
        );
        assert_eq!(ServiceError::other(QuotaError).kind(), ErrorKind::Unclassified);
    }

    #[test]
    fn test_unclassified_defaults_to_bad_request() {
        let err = ServiceError::other(QuotaError);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "disk quota exceeded");
    }

    #[test]
    fn test_message_passthrough() {
        assert_eq!(ServiceError::invalid_argument("Invalid input").to_string(), "Invalid input");
        assert_eq!(ServiceError::runtime("Server error").to_string(), "Server error");
        assert_eq!(
            ServiceError::UnknownOperation("archive".into()).to_string(),
            "Unknown operation: archive"
        );
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = ServiceError::from(err);
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
