// Success-status policy
// Chooses the HTTP status for a non-error result, per operation

use hyper::StatusCode;
use std::collections::HashMap;

/// Per-operation success status, supplied by the concrete controller
pub trait SuccessStatusPolicy {
    fn success_status(&self, operation: &str) -> StatusCode;
}

impl<F> SuccessStatusPolicy for F
where
    F: Fn(&str) -> StatusCode,
{
    fn success_status(&self, operation: &str) -> StatusCode {
        self(operation)
    }
}

/// Table of operation overrides with a fallback status
#[derive(Debug, Clone)]
pub struct SuccessStatuses {
    overrides: HashMap<String, StatusCode>,
    default: StatusCode,
}

impl SuccessStatuses {
    /// Every operation succeeds with 200 until overridden
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
            default: StatusCode::OK,
        }
    }

    /// `create` → 201, `delete` → 204, everything else → 200
    pub fn rest_conventions() -> Self {
        Self::new()
            .with("create", StatusCode::CREATED)
            .with("delete", StatusCode::NO_CONTENT)
    }

    #[must_use]
    pub fn with(mut self, operation: impl Into<String>, status: StatusCode) -> Self {
        self.overrides.insert(operation.into(), status);
        self
    }

    #[must_use]
    pub const fn with_default(mut self, status: StatusCode) -> Self {
        self.default = status;
        self
    }
}

impl Default for SuccessStatuses {
    fn default() -> Self {
        Self::new()
    }
}

impl SuccessStatusPolicy for SuccessStatuses {
    fn success_status(&self, operation: &str) -> StatusCode {
        self.overrides
            .get(operation)
            .copied()
            .unwrap_or(self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_conventions() {
        let statuses = SuccessStatuses::rest_conventions();
        assert_eq!(statuses.success_status("create"), StatusCode::CREATED);
        assert_eq!(statuses.success_status("delete"), StatusCode::NO_CONTENT);
        assert_eq!(statuses.success_status("show"), StatusCode::OK);
    }

    #[test]
    fn test_custom_default() {
        let statuses = SuccessStatuses::new()
            .with("import", StatusCode::ACCEPTED)
            .with_default(StatusCode::NON_AUTHORITATIVE_INFORMATION);
        assert_eq!(statuses.success_status("import"), StatusCode::ACCEPTED);
        assert_eq!(
            statuses.success_status("list"),
            StatusCode::NON_AUTHORITATIVE_INFORMATION
        );
    }

    #[test]
    fn test_closure_policy() {
        let policy = |operation: &str| {
            if operation.starts_with("create") {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            }
        };
        assert_eq!(policy.success_status("createBatch"), StatusCode::CREATED);
        assert_eq!(policy.success_status("list"), StatusCode::OK);
    }
}
