//! Trusted HTTP client.
//!
//! Every request leaving the proxy goes through a [`Transport`]. The
//! default implementation, [`TrustedClient`], is a pooled hyper client that
//! stamps the configured credentials onto each request and bounds the call
//! with the configured timeouts.

use crate::http::{ProxyRequest, ProxyResponse, StatusCode};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Header asking the remote side to start a digest authentication handshake.
pub const REQUESTED_AUTH_HEADER: &str = "X-Requested-Auth";

/// Trait for issuing HTTP requests to remote services.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request whose `url` is absolute and return the buffered response.
    ///
    /// Any status is returned as `Ok`; deciding which statuses are acceptable
    /// is left to the caller.
    async fn send(&self, request: ProxyRequest) -> Result<ProxyResponse, TransportError>;
}

/// Errors raised while talking to a remote service.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid request to {url}: {reason}")]
    InvalidRequest { url: String, reason: String },
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("reading response body from {url} failed: {reason}")]
    Body { url: String, reason: String },
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
}

/// Configuration for the [`TrustedClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Total timeout for sending a request and reading its body, in seconds.
    pub request_timeout_secs: u64,
    /// Whether to send the digest handshake marker header.
    pub digest_marker: bool,
    /// Headers added to every request, e.g. `Authorization`.
    pub auth_headers: HashMap<String, String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 60,
            request_timeout_secs: 300,
            digest_marker: true,
            auth_headers: HashMap::new(),
        }
    }
}

impl TransportConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connect timeout in seconds.
    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Set the total request timeout in seconds.
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Add a header sent with every request.
    pub fn auth_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.auth_headers.insert(key.into(), value.into());
        self
    }

    /// Enable or disable the digest marker header.
    pub fn digest_marker(mut self, enabled: bool) -> Self {
        self.digest_marker = enabled;
        self
    }
}

/// Pooled HTTP client that authenticates every request.
#[derive(Clone)]
pub struct TrustedClient {
    client: Client<HttpConnector, Empty<Bytes>>,
    config: TransportConfig,
}

impl TrustedClient {
    /// Create a new client.
    pub fn new(config: TransportConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client, config }
    }

    /// Convert a request into a hyper request carrying the trusted headers.
    fn build_request(
        &self,
        request: ProxyRequest,
    ) -> Result<hyper::Request<Empty<Bytes>>, TransportError> {
        let invalid = |reason: String| TransportError::InvalidRequest {
            url: request.url.clone(),
            reason,
        };

        let uri = request
            .url
            .parse::<hyper::Uri>()
            .map_err(|e| invalid(e.to_string()))?;

        let mut builder = hyper::Request::builder()
            .method(request.method.clone())
            .uri(uri);

        for (name, value) in &self.config.auth_headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if self.config.digest_marker {
            builder = builder.header(REQUESTED_AUTH_HEADER, "Digest");
        }

        builder
            .body(Empty::new())
            .map_err(|e| invalid(e.to_string()))
    }

    async fn execute(
        &self,
        url: &str,
        request: hyper::Request<Empty<Bytes>>,
    ) -> Result<ProxyResponse, TransportError> {
        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                reason: error_chain(&e),
            })?;

        let status = StatusCode(response.status().as_u16());
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_string(), v.to_string());
            }
        }

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| TransportError::Body {
                url: url.to_string(),
                reason: error_chain(&e),
            })?
            .to_bytes();

        debug!("{} answered {} ({} bytes)", url, status, body.len());

        Ok(ProxyResponse {
            status,
            headers,
            body: Some(body),
        })
    }
}

#[async_trait]
impl Transport for TrustedClient {
    async fn send(&self, request: ProxyRequest) -> Result<ProxyResponse, TransportError> {
        let url = request.url.clone();
        let method = request.method.clone();
        let hyper_request = self.build_request(request)?;
        let timeout = Duration::from_secs(self.config.request_timeout_secs);

        debug!("Sending {} {}", method, url);

        tokio::time::timeout(timeout, self.execute(&url, hyper_request))
            .await
            .map_err(|_| TransportError::Timeout {
                url: url.clone(),
                timeout,
            })?
    }
}

/// Render an error together with all of its sources.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
