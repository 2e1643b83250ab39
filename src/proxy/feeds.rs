//! The feed listing endpoint.

use crate::http::ProxyResponse;
use crate::proxy::RemoteService;
use tracing::error;

/// Path of the feed listing, both inbound and on the feed service.
pub const FEEDS_PATH: &str = "/feeds";

/// Relays the feed listing of a remote feed service.
///
/// The upstream body is passed through byte for byte. Every failure, be it
/// discovery, connection or an unexpected upstream status, is logged once and
/// answered with an empty 500.
#[derive(Clone)]
pub struct FeedProxy {
    remote: RemoteService,
}

impl FeedProxy {
    /// Create a feed proxy on top of a remote feed service.
    pub fn new(remote: RemoteService) -> Self {
        Self { remote }
    }

    /// Handle `GET /feeds`.
    pub async fn list_feeds(&self) -> ProxyResponse {
        match self.remote.get(FEEDS_PATH).await {
            Ok(upstream) => ProxyResponse::raw_json(upstream.body.unwrap_or_default()),
            Err(failure) => {
                error!(
                    "Error requesting data from feeds endpoint of '{}': {}",
                    self.remote.service_type(),
                    failure
                );
                failure.into()
            }
        }
    }
}
