//! Dispatch results.
//!
//! Handlers write into a [`Response`]; the router wraps it with the
//! [`Outcome`] of the scan so callers can tell a handled request from a
//! fallback.

use axum::http::StatusCode;
use crate::routing::Method;

/// What the scan decided for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Route at this index matched both path and method.
    Matched { route: usize },
    /// No route pattern matched the path.
    NotFound,
    /// A pattern matched but no route carried the request method.
    MethodNotAllowed { method: Method },
}

impl Outcome {
    /// Short label used for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Matched { .. } => "matched",
            Outcome::NotFound => "not_found",
            Outcome::MethodNotAllowed { .. } => "method_not_allowed",
        }
    }
}

/// Response state shared by middleware, handler and fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: String,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            body: String::new(),
        }
    }
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Set a header, replacing any earlier value under the same
    /// (case-insensitive) name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Append to the body.
    pub fn write(&mut self, chunk: &str) {
        self.body.push_str(chunk);
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }
}

/// Result of a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub outcome: Outcome,
    pub response: Response,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_is_ok() {
        let response = Response::new();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut response = Response::new();
        response.set_header("Content-Type", "text/plain");
        response.set_header("content-type", "application/json");
        assert_eq!(response.headers().len(), 1);
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn test_write_appends() {
        let mut response = Response::new();
        response.write("a");
        response.write("b");
        assert_eq!(response.body(), "ab");
    }
}
