//! Feed proxy server.
//!
//! Usage: `feedproxy [config.json]`. Log filtering follows `RUST_LOG`.

use feedproxy::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            ProxyConfig::from_file(&path)?
        }
        None => ProxyConfig::default(),
    };

    if config.services.is_empty() {
        tracing::warn!(
            "No '{}' instances configured, /feeds will answer 500",
            config.feed_service_type
        );
    }

    let port = config.port;
    let server = ProxyServer::new(config);
    let services = server.registry().list().await?;
    tracing::info!("Starting feed proxy with {} registered service(s)...", services.len());
    tracing::info!("Try: curl http://localhost:{}/feeds", port);

    server.run().await
}
