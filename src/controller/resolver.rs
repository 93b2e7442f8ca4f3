//! Response resolution
//!
//! Runs one service operation against the normalized input and turns its
//! outcome into a [`ResolvedResponse`]. Errors raised by the service never
//! escape: they are classified and answered with `{error: message}`.

use hyper::StatusCode;

use super::error::ServiceError;
use super::response::ResolvedResponse;
use super::service::{Service, ServiceResult};
use super::status::{SuccessStatusPolicy, SuccessStatuses};
use crate::logger;
use crate::request::{collect, Inputs, RequestSource};

/// A service paired with the statuses its successful operations report
pub struct Controller<S, P = SuccessStatuses> {
    service: S,
    statuses: P,
}

impl<S, P> Controller<S, P>
where
    S: Service,
    P: SuccessStatusPolicy,
{
    pub const fn new(service: S, statuses: P) -> Self {
        Self { service, statuses }
    }

    pub const fn service(&self) -> &S {
        &self.service
    }

    pub fn success_status(&self, operation: &str) -> StatusCode {
        self.statuses.success_status(operation)
    }

    /// Status for a returned result
    ///
    /// An `errors` key always means 400, whatever the operation declares.
    pub fn determine_status(&self, result: &ServiceResult, operation: &str) -> StatusCode {
        if result.is_failure() {
            StatusCode::BAD_REQUEST
        } else {
            self.success_status(operation)
        }
    }

    /// Normalize the request, run `operation` and resolve the outcome
    pub fn handle_request<R>(
        &self,
        request: &R,
        operation: &str,
        route_params: Option<&Inputs>,
    ) -> ResolvedResponse
    where
        R: RequestSource + ?Sized,
    {
        let data = collect(request, route_params);

        match self.service().call(operation, data) {
            Ok(result) => {
                let status = self.determine_status(&result, operation);
                ResolvedResponse::json(status, result.into_value())
            }
            Err(err) => {
                let response = error_response(&err);
                logger::log_service_error(operation, response.status(), &err);
                response
            }
        }
    }
}

/// Map a raised service error to its response
pub fn error_response(err: &ServiceError) -> ResolvedResponse {
    ResolvedResponse::error(err.status(), &err.to_string())
}

/// Anything the router can dispatch a request to
pub trait Endpoint {
    fn handle(
        &self,
        request: &dyn RequestSource,
        operation: &str,
        route_params: &Inputs,
    ) -> ResolvedResponse;
}

impl<S, P> Endpoint for Controller<S, P>
where
    S: Service,
    P: SuccessStatusPolicy,
{
    fn handle(
        &self,
        request: &dyn RequestSource,
        operation: &str,
        route_params: &Inputs,
    ) -> ResolvedResponse {
        self.handle_request(request, operation, Some(route_params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::BufferedRequest;
    use serde_json::{json, Value};

    /// Test service: behavior is chosen by operation name
    struct ScriptedService;

    impl Service for ScriptedService {
        fn call(&self, operation: &str, input: Inputs) -> Result<ServiceResult, ServiceError> {
            match operation {
                "testMethod" => Ok(ServiceResult::success(json!({"id": 1}))),
                "echo" => Ok(ServiceResult::success(Value::Object(input))),
                "create" => Ok(ServiceResult::success(json!({"id": 2}))),
                "failValidation" => Ok(ServiceResult::failure(json!({"name": "Name is required"}))),
                "throwInvalid" => Err(ServiceError::invalid_argument("Invalid input")),
                "throwRuntime" => Err(ServiceError::runtime("Server error")),
                "throwOther" => Err(ServiceError::other("Quota exceeded")),
                other => Err(ServiceError::UnknownOperation(other.to_string())),
            }
        }
    }

    fn controller() -> Controller<ScriptedService> {
        Controller::new(ScriptedService, SuccessStatuses::new().with("create", StatusCode::CREATED))
    }

    #[test]
    fn test_determine_status_success() {
        let result = ServiceResult::success(json!({"id": 1}));
        assert_eq!(controller().determine_status(&result, "testMethod"), StatusCode::OK);
        assert_eq!(controller().determine_status(&result, "create"), StatusCode::CREATED);
    }

    #[test]
    fn test_determine_status_errors_win() {
        let result = ServiceResult::failure(json!({"name": "Name is required"}));
        assert_eq!(
            controller().determine_status(&result, "testMethod"),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            controller().determine_status(&result, "create"),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_handle_success() {
        let response = controller().handle_request(&BufferedRequest::new(), "testMethod", None);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), Some(&json!({"data": {"id": 1}})));
    }

    #[test]
    fn test_handle_uses_success_policy() {
        let response = controller().handle_request(&BufferedRequest::new(), "create", None);
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_handle_validation_failure() {
        let response = controller().handle_request(&BufferedRequest::new(), "failValidation", None);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body(),
            Some(&json!({"errors": {"name": "Name is required"}}))
        );
    }

    #[test]
    fn test_handle_invalid_argument() {
        let response = controller().handle_request(&BufferedRequest::new(), "throwInvalid", None);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body(), Some(&json!({"error": "Invalid input"})));
    }

    #[test]
    fn test_handle_runtime_error() {
        let response = controller().handle_request(&BufferedRequest::new(), "throwRuntime", None);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body(), Some(&json!({"error": "Server error"})));
    }

    #[test]
    fn test_handle_unclassified_error() {
        let response = controller().handle_request(&BufferedRequest::new(), "throwOther", None);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body(), Some(&json!({"error": "Quota exceeded"})));

        let response = controller().handle_request(&BufferedRequest::new(), "archive", None);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body(),
            Some(&json!({"error": "Unknown operation: archive"}))
        );
    }

    #[test]
    fn test_handle_passes_normalized_input() {
        let request = BufferedRequest::new()
            .with_query([("id", "9"), ("page", "1")])
            .with_body(r#"{"name":"Lamp"}"#);
        let mut route = Inputs::new();
        route.insert("id".into(), json!("3"));

        let response = controller().handle_request(&request, "echo", Some(&route));
        assert_eq!(
            response.body(),
            Some(&json!({"data": {"id": "3", "page": "1", "name": "Lamp"}}))
        );
    }

    #[test]
    fn test_endpoint_dispatch() {
        let endpoint: &dyn Endpoint = &controller();
        let response = endpoint.handle(&BufferedRequest::new(), "testMethod", &Inputs::new());
        assert_eq!(response.status(), StatusCode::OK);
    }
}
