//! Failure type shared by all calls to a remote service.

use crate::discovery::DiscoveryError;
use crate::http::{ProxyResponse, StatusCode};
use crate::transport::TransportError;

/// Any failure while obtaining a response from a remote service.
///
/// Callers of a proxy endpoint never see which variant occurred; they all
/// surface as a bare 500.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamFailure {
    #[error("discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),
    #[error("{url} answered with unexpected status {status}")]
    UnexpectedStatus { url: String, status: StatusCode },
}

impl From<UpstreamFailure> for ProxyResponse {
    fn from(_: UpstreamFailure) -> Self {
        ProxyResponse::internal_error()
    }
}
