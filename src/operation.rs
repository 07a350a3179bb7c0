//! Request and response envelope types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{HubError, HubResult};

/// One outbound GraphQL query: text plus a named-variable mapping.
///
/// Variables are converted to JSON at insertion time, so a value that cannot
/// be represented in JSON fails here, before any network I/O.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    /// Query text.
    pub query: String,
    /// Variables keyed by name.
    pub variables: Map<String, Value>,
}

impl QueryRequest {
    /// Create a request with no variables.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
        }
    }

    /// Attach a named variable.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Serialize) -> HubResult<Self> {
        let value = serde_json::to_value(value).map_err(|err| HubError::Serialize(err.to_string()))?;
        self.variables.insert(name.into(), value);
        Ok(self)
    }

    /// Replace the whole variable mapping.
    #[must_use]
    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = variables;
        self
    }
}

/// One server-reported GraphQL error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlError {
    /// Human-readable error message.
    pub message: String,
}

/// GraphQL response envelope, generic over the data payload shape.
///
/// Unknown fields are ignored; a missing required field inside `T` is a
/// decode error.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GraphqlResponse<T> {
    /// Response data.
    #[serde(default)]
    pub data: Option<T>,
    /// GraphQL errors; may be absent or empty.
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl<T> GraphqlResponse<T> {
    /// Returns `true` if no GraphQL errors were returned.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
