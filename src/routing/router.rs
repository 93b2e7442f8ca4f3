//! Route table module
//!
//! Maps a method and path to the endpoint and operation that serve it.
//! Routes are tried in registration order; the first match wins.

use hyper::Method;
use std::rc::Rc;

use super::matcher::PathPattern;
use crate::controller::Endpoint;
use crate::request::Inputs;

/// One registered route
pub struct Route {
    method: Method,
    pattern: PathPattern,
    operation: String,
    endpoint: Rc<dyn Endpoint>,
}

impl Route {
    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

/// Outcome of routing a request
pub enum RouteMatch<'a> {
    Found {
        endpoint: &'a dyn Endpoint,
        operation: &'a str,
        params: Inputs,
    },
    /// The path exists but not for this method
    MethodNotAllowed { allow: Vec<Method> },
    NotFound,
}

#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(
        mut self,
        method: Method,
        pattern: &str,
        operation: &str,
        endpoint: &Rc<dyn Endpoint>,
    ) -> Self {
        self.routes.push(Route {
            method,
            pattern: PathPattern::parse(pattern),
            operation: operation.to_string(),
            endpoint: Rc::clone(endpoint),
        });
        self
    }

    /// Register the conventional REST operations for a collection
    ///
    /// | Method | Path          | Operation |
    /// |--------|---------------|-----------|
    /// | GET    | `base`        | `list`    |
    /// | POST   | `base`        | `create`  |
    /// | GET    | `base/{id}`   | `show`    |
    /// | PUT    | `base/{id}`   | `update`  |
    /// | PATCH  | `base/{id}`   | `update`  |
    /// | DELETE | `base/{id}`   | `delete`  |
    #[must_use]
    pub fn resource(self, base: &str, endpoint: &Rc<dyn Endpoint>) -> Self {
        let base = base.trim_end_matches('/');
        let item = format!("{base}/{{id}}");
        self.route(Method::GET, base, "list", endpoint)
            .route(Method::POST, base, "create", endpoint)
            .route(Method::GET, &item, "show", endpoint)
            .route(Method::PUT, &item, "update", endpoint)
            .route(Method::PATCH, &item, "update", endpoint)
            .route(Method::DELETE, &item, "delete", endpoint)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Find the route serving `method` and `path`
    pub fn resolve(&self, method: &Method, path: &str) -> RouteMatch<'_> {
        let mut allow = Vec::new();

        for route in &self.routes {
            let Some(params) = route.pattern.match_path(path) else {
                continue;
            };
            if serves(&route.method, method) {
                return RouteMatch::Found {
                    endpoint: route.endpoint.as_ref(),
                    operation: &route.operation,
                    params,
                };
            }
            if !allow.contains(&route.method) {
                allow.push(route.method.clone());
            }
        }

        if allow.is_empty() {
            RouteMatch::NotFound
        } else {
            RouteMatch::MethodNotAllowed { allow }
        }
    }
}

/// HEAD is answered by the GET route; hyper drops the body
fn serves(route_method: &Method, method: &Method) -> bool {
    route_method == method || (*method == Method::HEAD && *route_method == Method::GET)
}
