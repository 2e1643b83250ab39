//! Outbound request type handed to a [`Transport`](crate::transport::Transport).

/// A request addressed to a remote service.
///
/// `url` starts out relative to the service (`/feeds`) and is rewritten to
/// an absolute URL once an instance has been resolved.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    /// HTTP method.
    pub method: hyper::Method,
    /// Request URL.
    pub url: String,
}

impl ProxyRequest {
    /// Create a new request.
    pub fn new(method: hyper::Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
        }
    }

    /// Create a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(hyper::Method::GET, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_request() {
        let request = ProxyRequest::get("/feeds");

        assert_eq!(request.method, hyper::Method::GET);
        assert_eq!(request.url, "/feeds");
    }
}
