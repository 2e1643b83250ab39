//! Response type returned by transports and by the proxy endpoint.

use bytes::Bytes;
use std::collections::HashMap;

/// HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An HTTP response with its body fully buffered.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// HTTP headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Option<Bytes>,
}

impl ProxyResponse {
    /// Create a new response with the given status code and no body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create an OK response.
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Wrap an already serialized JSON document without touching its bytes.
    pub fn raw_json(body: impl Into<Bytes>) -> Self {
        Self::ok()
            .header("Content-Type", "application/json")
            .body(body)
    }

    /// Create a text response.
    pub fn text(content: impl Into<String>) -> Self {
        Self::ok()
            .header("Content-Type", "text/plain")
            .body(content.into())
    }

    /// Create an error response with a plain text message.
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status)
            .header("Content-Type", "text/plain")
            .body(message.into())
    }

    /// A 500 with no body and no headers.
    pub fn internal_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Add a header to the response.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the response body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_json_keeps_bytes() {
        let payload = br#"{ "feeds" : [ 1,2 ] }"#.to_vec();
        let response = ProxyResponse::raw_json(payload.clone());

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(response.body.as_deref(), Some(payload.as_slice()));
    }

    #[test]
    fn test_error_carries_message() {
        let response = ProxyResponse::error(StatusCode::NOT_FOUND, "Not found");

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body.as_deref(), Some(&b"Not found"[..]));
    }

    #[test]
    fn test_internal_error_is_empty() {
        let response = ProxyResponse::internal_error();

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body.is_none());
        assert!(response.headers.is_empty());
    }
}
