//! Endpoint descriptor: the static definition of one remote operation.
//!
//! # Design
//! An [`Endpoint`] is built fresh for every invocation and is immutable once
//! handed to the client. Path parameters are substituted into the template
//! at build time, query pairs accumulate in declaration order, and the body
//! is serialized eagerly so a codec failure surfaces before any network I/O.

use std::fmt::Display;

use serde::Serialize;

use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::param;

/// Required-parameter validation, applied before a request is built.
///
/// Fails fast with a validation error carrying a synthetic 400 and the
/// message `Missing the required parameter '<name>' when calling <op>`.
pub fn required_param<T>(value: Option<T>, name: &str, operation_id: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| {
        ApiError::validation(format!(
            "Missing the required parameter '{name}' when calling {operation_id}"
        ))
    })
}

/// One remote operation, fully described: method, path template with
/// substitutions applied, ordered query pairs, headers, and optional body.
#[derive(Debug, Clone)]
pub struct Endpoint {
    operation_id: String,
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl Endpoint {
    pub fn new(operation_id: &str, method: HttpMethod, path: &str) -> Self {
        Self {
            operation_id: operation_id.to_string(),
            method,
            path: path.to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Substitute `{name}` in the path template with the encoded value.
    pub fn path_param(mut self, name: &str, value: impl Display) -> Self {
        self.path = param::expand_path(&self.path, name, &value);
        self
    }

    /// Append an optional singular query parameter. `None` is omitted.
    pub fn query(mut self, name: &str, value: Option<impl Display>) -> Self {
        if let Some(v) = value {
            self.query.extend(param::query_pairs(name, Some(&v)));
        }
        self
    }

    /// Append a multi-valued query parameter, one pair per element.
    pub fn query_multi<I, T>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.query.extend(param::query_pairs_multi(name, values));
        self
    }

    /// Append an operation-specific header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serialize a JSON request body. A serialization failure is surfaced
    /// as a decoding error wrapping the cause, before any I/O happens.
    pub fn json_body(mut self, body: &impl Serialize) -> Result<Self, ApiError> {
        let bytes = serde_json::to_vec(body).map_err(|e| {
            ApiError::decoding(
                format!(
                    "could not serialize request body for {}: {e}",
                    self.operation_id
                ),
                e,
            )
        })?;
        self.body = Some(bytes);
        Ok(self)
    }

    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Path with all placeholders substituted, query string excluded.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Encoded query pairs in declaration order.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Path plus rendered query string, as it will appear on the wire.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, param::query_string(&self.query))
        }
    }
}
