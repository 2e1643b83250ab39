//! Discovery plus transport, composed into one call.

use crate::discovery::ServiceRegistry;
use crate::http::{ProxyRequest, ProxyResponse, StatusCode};
use crate::proxy::UpstreamFailure;
use crate::transport::Transport;
use std::sync::Arc;
use tracing::debug;

/// Client side of a remote service of one service type.
#[derive(Clone)]
pub struct RemoteService {
    service_type: String,
    registry: Arc<dyn ServiceRegistry>,
    transport: Arc<dyn Transport>,
}

impl RemoteService {
    /// Create a remote service handle.
    pub fn new(
        service_type: impl Into<String>,
        registry: Arc<dyn ServiceRegistry>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            service_type: service_type.into(),
            registry,
            transport,
        }
    }

    /// The service type requests are routed to.
    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    /// Send `request` to the least loaded available instance.
    ///
    /// `request.url` is interpreted relative to the instance's base URL. The
    /// request is sent exactly once; a response whose status is not listed in
    /// `accepted` is reported as [`UpstreamFailure::UnexpectedStatus`].
    pub async fn get_response(
        &self,
        mut request: ProxyRequest,
        accepted: &[StatusCode],
    ) -> Result<ProxyResponse, UpstreamFailure> {
        let instance = self.registry.resolve_instance(&self.service_type).await?;
        let url = instance.url_for(&request.url);
        debug!("Resolved '{}' to {}", self.service_type, instance.base_url());

        request.url = url.clone();
        let response = self.transport.send(request).await?;

        if accepted.contains(&response.status) {
            Ok(response)
        } else {
            Err(UpstreamFailure::UnexpectedStatus {
                url,
                status: response.status,
            })
        }
    }

    /// GET `path` from the service, accepting only 200.
    pub async fn get(&self, path: &str) -> Result<ProxyResponse, UpstreamFailure> {
        self.get_response(ProxyRequest::get(path), &[StatusCode::OK])
            .await
    }
}
