//! HTTP runtime serving the proxy endpoints.

mod config;
mod server;

pub use config::{ConfigError, ProxyConfig};
pub use server::ProxyServer;
