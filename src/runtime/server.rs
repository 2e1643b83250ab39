//! Proxy HTTP server.

use crate::discovery::{MemoryRegistry, ServiceRegistry};
use crate::http::{ProxyResponse, StatusCode};
use crate::proxy::{FeedProxy, RemoteService, FEEDS_PATH};
use crate::runtime::ProxyConfig;
use crate::transport::{Transport, TrustedClient};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Proxy server.
///
/// Accepts HTTP/1 connections and routes `GET /feeds` to the [`FeedProxy`].
pub struct ProxyServer {
    /// Server configuration.
    config: ProxyConfig,
    /// Service registry used to locate the feed service.
    registry: Arc<dyn ServiceRegistry>,
    /// Feed listing endpoint.
    feeds: Arc<FeedProxy>,
}

impl ProxyServer {
    /// Create a server with an in-memory registry seeded from the config and
    /// a [`TrustedClient`] built from the transport settings.
    pub fn new(config: ProxyConfig) -> Self {
        let registry = Arc::new(MemoryRegistry::with_registrations(config.services.clone()));
        let transport = Arc::new(TrustedClient::new(config.transport.clone()));
        Self::with_collaborators(config, registry, transport)
    }

    /// Create a server on top of externally supplied collaborators.
    pub fn with_collaborators(
        config: ProxyConfig,
        registry: Arc<dyn ServiceRegistry>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let remote = RemoteService::new(
            config.feed_service_type.clone(),
            registry.clone(),
            transport,
        );
        Self {
            config,
            registry,
            feeds: Arc::new(FeedProxy::new(remote)),
        }
    }

    /// Get the service registry.
    pub fn registry(&self) -> Arc<dyn ServiceRegistry> {
        self.registry.clone()
    }

    /// Bind the configured address. Host names are resolved.
    pub async fn bind(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind(self.config.bind_addr()).await
    }

    /// Bind the configured address and serve until an accept error occurs.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Feed proxy listening on {}", listener.local_addr()?);

        let feeds = self.feeds.clone();
        let config = Arc::new(self.config);

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);

            let feeds = feeds.clone();
            let config = config.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let feeds = feeds.clone();
                    let config = config.clone();
                    async move { handle_request(req, feeds, config, remote_addr).await }
                });

                if let Err(err) = http1::Builder::new()
                    .serve_connection(io, service)
                    .await
                {
                    error!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

/// Handle an incoming HTTP request.
async fn handle_request(
    req: Request<Incoming>,
    feeds: Arc<FeedProxy>,
    config: Arc<ProxyConfig>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();
    let request_id = generate_request_id();

    debug!(
        "Handling request: {} {} from {} [{}]",
        method, path, remote_addr, request_id
    );

    if config.enable_health && path == "/_health" {
        return Ok(build_response(ProxyResponse::text("OK")));
    }

    let response = if path == FEEDS_PATH {
        if method == hyper::Method::GET {
            feeds.list_feeds().await
        } else {
            ProxyResponse::error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
                .header("Allow", "GET")
        }
    } else {
        ProxyResponse::error(StatusCode::NOT_FOUND, "Not found")
    };

    debug!("Answered {} [{}]", response.status, request_id);
    Ok(build_response(response))
}

/// Build a hyper Response from a ProxyResponse.
fn build_response(proxy_response: ProxyResponse) -> Response<Full<Bytes>> {
    let status = hyper::StatusCode::from_u16(proxy_response.status.0).unwrap_or_else(|_| {
        warn!(
            "Invalid status code {}, falling back to 500 Internal Server Error",
            proxy_response.status.0
        );
        hyper::StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut response = Response::new(Full::new(proxy_response.body.unwrap_or_default()));
    *response.status_mut() = status;

    for (name, value) in proxy_response.headers {
        match (
            hyper::header::HeaderName::try_from(name.as_str()),
            hyper::header::HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                response.headers_mut().insert(name, value);
            }
            _ => warn!("Dropping invalid response header '{}'", name),
        }
    }

    response
}

/// Generate a unique request ID.
fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{:x}", timestamp)
}
