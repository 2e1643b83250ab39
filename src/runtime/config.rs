//! Proxy configuration.

use crate::discovery::ServiceRegistration;
use crate::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for the proxy server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Whether to enable health check endpoint.
    pub enable_health: bool,
    /// Service type the feed listing is requested from.
    pub feed_service_type: String,
    /// Outbound transport settings.
    pub transport: TransportConfig,
    /// Registrations the service registry starts with.
    pub services: Vec<ServiceRegistration>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_health: true,
            feed_service_type: "org.opencastproject.feed".to_string(),
            transport: TransportConfig::default(),
            services: Vec::new(),
        }
    }
}

impl ProxyConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a config from a JSON document.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Set the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the feed service type.
    pub fn feed_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.feed_service_type = service_type.into();
        self
    }

    /// Set the transport settings.
    pub fn transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }

    /// Add an initial service registration.
    pub fn service(mut self, registration: ServiceRegistration) -> Self {
        self.services.push(registration);
        self
    }

    /// Get the bind address.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProxyConfig::new();

        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert!(config.enable_health);
        assert_eq!(config.feed_service_type, "org.opencastproject.feed");
        assert!(config.services.is_empty());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = ProxyConfig::from_json(
            r#"{
                "port": 9090,
                "transport": { "auth_headers": { "Authorization": "Basic abc" } },
                "services": [
                    { "service_type": "org.opencastproject.feed", "host": "http://node-1:8080", "load": 3 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.transport.request_timeout_secs, 300);
        assert_eq!(
            config.transport.auth_headers.get("Authorization"),
            Some(&"Basic abc".to_string())
        );
        assert_eq!(config.services.len(), 1);
        assert_eq!(config.services[0].load, 3);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let result = ProxyConfig::from_json("port = 1");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_missing_file() {
        let result = ProxyConfig::from_file("/nonexistent/feedproxy.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
