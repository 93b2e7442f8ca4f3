//! Service contract
//!
//! A service exposes named operations. Each takes the normalized input and
//! returns a [`ServiceResult`] or raises a [`ServiceError`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::error::ServiceError;
use crate::request::Inputs;

/// Key whose presence marks a result as a failure
pub const ERRORS_KEY: &str = "errors";

/// Business logic behind a controller
pub trait Service {
    /// Run `operation` with the normalized input
    fn call(&self, operation: &str, input: Inputs) -> Result<ServiceResult, ServiceError>;
}

impl<F> Service for F
where
    F: Fn(&str, Inputs) -> Result<ServiceResult, ServiceError>,
{
    fn call(&self, operation: &str, input: Inputs) -> Result<ServiceResult, ServiceError> {
        self(operation, input)
    }
}

/// Mapping returned by a service operation
///
/// A result holding an `errors` key is a failure, whatever else it holds;
/// every other result is a success.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ServiceResult(Map<String, Value>);

impl ServiceResult {
    pub const fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// `{data: data}`
    pub fn success(data: impl Into<Value>) -> Self {
        let mut map = Map::new();
        map.insert("data".to_string(), data.into());
        Self(map)
    }

    /// `{errors: errors}`
    pub fn failure(errors: impl Into<Value>) -> Self {
        let mut map = Map::new();
        map.insert(ERRORS_KEY.to_string(), errors.into());
        Self(map)
    }

    /// Serialize any value into a success result's `data`
    pub fn from_data<T: Serialize>(data: &T) -> Result<Self, ServiceError> {
        serde_json::to_value(data)
            .map(Self::success)
            .map_err(|e| ServiceError::runtime(format!("Failed to serialize result: {e}")))
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.0
            .insert("message".to_string(), Value::String(message.into()));
        self
    }

    pub fn is_failure(&self) -> bool {
        self.0.contains_key(ERRORS_KEY)
    }

    pub fn errors(&self) -> Option<&Value> {
        self.0.get(ERRORS_KEY)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for ServiceResult {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<ServiceResult> for Value {
    fn from(result: ServiceResult) -> Self {
        result.into_value()
    }
}

/// Deserialize normalized input into a typed request
///
/// Shape mismatches become [`ServiceError::InvalidArgument`].
pub fn parse_input<T: DeserializeOwned>(input: Inputs) -> Result<T, ServiceError> {
    Ok(serde_json::from_value(Value::Object(input))?)
}
