//! # feedproxy - Discovery-aware feed listing proxy
//!
//! `feedproxy` answers `GET /feeds` by locating a live instance of the feed
//! service in a service registry, fetching `/feeds` from it with a trusted
//! HTTP client and relaying the JSON body unchanged.
//!
//! ## Architecture
//!
//! ```text
//!   client ──GET /feeds──▶ ┌──────────────────────────────────────────┐
//!                          │              ProxyServer                 │
//!                          │  ┌────────────────────────────────────┐  │
//!                          │  │            FeedProxy               │  │
//!                          │  │  ┌──────────────────────────────┐  │  │
//!                          │  │  │        RemoteService         │  │  │
//!                          │  │  │  ServiceRegistry  Transport  │  │  │
//!                          │  │  └──────────────────────────────┘  │  │
//!                          │  └────────────────────────────────────┘  │
//!                          └──────────────────┬───────────────────────┘
//!                                             │ GET <base>/feeds
//!                                             ▼
//!                                   feed service instance
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use feedproxy::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = ProxyConfig::new().port(8080).service(ServiceRegistration::new(
//!         "org.opencastproject.feed",
//!         "http://node-1:8080",
//!         "/",
//!     ));
//!
//!     ProxyServer::new(config).run().await
//! }
//! ```
//!
//! ## Failure handling
//!
//! Discovery failures, connection failures and unexpected upstream statuses
//! are all logged once and answered with an empty `500`. Requests are never
//! retried.

pub mod discovery;
pub mod http;
pub mod proxy;
pub mod runtime;
pub mod transport;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::discovery::{DiscoveryError, MemoryRegistry, ServiceRegistration, ServiceRegistry};
    pub use crate::http::{ProxyRequest, ProxyResponse, StatusCode};
    pub use crate::proxy::{FeedProxy, RemoteService, UpstreamFailure};
    pub use crate::runtime::{ProxyConfig, ProxyServer};
    pub use crate::transport::{Transport, TransportConfig, TransportError, TrustedClient};
    pub use async_trait::async_trait;
}

// Re-export for convenience
pub use discovery::{MemoryRegistry, ServiceRegistration, ServiceRegistry};
pub use proxy::{FeedProxy, UpstreamFailure};
pub use runtime::{ProxyConfig, ProxyServer};
pub use transport::{Transport, TrustedClient};
