//! Service registry trait and its in-memory implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// A service offered by one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRegistration {
    /// Service type identifier.
    pub service_type: String,
    /// Scheme and authority of the host, e.g. `http://node-1:8080`.
    pub host: String,
    /// Mount point of the service on the host.
    #[serde(default = "default_path")]
    pub path: String,
    /// Whether the host is reachable.
    #[serde(default = "default_true")]
    pub online: bool,
    /// Whether the host is enabled.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Whether the host is in maintenance mode.
    #[serde(default)]
    pub maintenance: bool,
    /// Current load reported for the host.
    #[serde(default)]
    pub load: u32,
}

fn default_path() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}

impl ServiceRegistration {
    /// Create an online, active registration with no load.
    pub fn new(
        service_type: impl Into<String>,
        host: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            service_type: service_type.into(),
            host: host.into(),
            path: path.into(),
            online: true,
            active: true,
            maintenance: false,
            load: 0,
        }
    }

    /// Set the load.
    pub fn load(mut self, load: u32) -> Self {
        self.load = load;
        self
    }

    /// Set the maintenance flag.
    pub fn maintenance(mut self, maintenance: bool) -> Self {
        self.maintenance = maintenance;
        self
    }

    /// Set the online flag.
    pub fn online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }

    /// Set the active flag.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Whether requests may be sent to this registration.
    pub fn is_available(&self) -> bool {
        self.online && self.active && !self.maintenance
    }

    /// The host joined with the mount path, without a trailing slash.
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        let path = self.path.trim_matches('/');
        if path.is_empty() {
            host.to_string()
        } else {
            format!("{}/{}", host, path)
        }
    }

    /// Absolute URL of `uri` under this registration.
    pub fn url_for(&self, uri: &str) -> String {
        format!("{}/{}", self.base_url(), uri.trim_start_matches('/'))
    }
}

/// Trait for service registry backends.
///
/// Implementations must be safe to share between concurrently running
/// request handlers.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// Register a service on a host.
    async fn register(&self, registration: ServiceRegistration) -> Result<(), DiscoveryError>;

    /// Remove the registration of a service on a host.
    async fn unregister(&self, service_type: &str, host: &str) -> Result<(), DiscoveryError>;

    /// Put every service of a host into or out of maintenance.
    async fn set_maintenance(&self, host: &str, maintenance: bool) -> Result<(), DiscoveryError>;

    /// Enable or disable every service of a host.
    async fn set_active(&self, host: &str, active: bool) -> Result<(), DiscoveryError>;

    /// Record the current load of a service on a host.
    async fn update_load(
        &self,
        service_type: &str,
        host: &str,
        load: u32,
    ) -> Result<(), DiscoveryError>;

    /// List all registrations.
    async fn list(&self) -> Result<Vec<ServiceRegistration>, DiscoveryError>;

    /// Available registrations of a service type, least loaded first.
    async fn registrations_by_load(
        &self,
        service_type: &str,
    ) -> Result<Vec<ServiceRegistration>, DiscoveryError>;

    /// Resolve the instance a request for `service_type` should go to.
    async fn resolve_instance(
        &self,
        service_type: &str,
    ) -> Result<ServiceRegistration, DiscoveryError> {
        self.registrations_by_load(service_type)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DiscoveryError::NoInstanceAvailable(service_type.to_string()))
    }
}

/// Error type for registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryError {
    #[error("no instance of service '{0}' is available")]
    NoInstanceAvailable(String),
    #[error("service '{service_type}' is already registered on '{host}'")]
    AlreadyRegistered { service_type: String, host: String },
    #[error("service '{service_type}' is not registered on '{host}'")]
    NotRegistered { service_type: String, host: String },
    #[error("host '{0}' is not registered")]
    UnknownHost(String),
}

/// In-memory implementation of [`ServiceRegistry`].
///
/// Registrations are grouped by service type.
#[derive(Default)]
pub struct MemoryRegistry {
    services: Arc<RwLock<HashMap<String, Vec<ServiceRegistration>>>>,
}

impl MemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the given registrations.
    ///
    /// Duplicates of an already seen (service type, host) pair are skipped.
    pub fn with_registrations(registrations: impl IntoIterator<Item = ServiceRegistration>) -> Self {
        let mut services: HashMap<String, Vec<ServiceRegistration>> = HashMap::new();
        for registration in registrations {
            let entries = services.entry(registration.service_type.clone()).or_default();
            if entries.iter().any(|r| r.host == registration.host) {
                debug!(
                    "Skipping duplicate registration of '{}' on {}",
                    registration.service_type, registration.host
                );
                continue;
            }
            entries.push(registration);
        }
        Self {
            services: Arc::new(RwLock::new(services)),
        }
    }

    /// Apply `update` to every registration on `host`.
    async fn update_host<F>(&self, host: &str, update: F) -> Result<(), DiscoveryError>
    where
        F: Fn(&mut ServiceRegistration),
    {
        let mut services = self.services.write().await;
        let mut found = false;
        for registration in services.values_mut().flatten() {
            if registration.host == host {
                update(registration);
                found = true;
            }
        }

        if found {
            Ok(())
        } else {
            Err(DiscoveryError::UnknownHost(host.to_string()))
        }
    }
}

#[async_trait]
impl ServiceRegistry for MemoryRegistry {
    async fn register(&self, registration: ServiceRegistration) -> Result<(), DiscoveryError> {
        let mut services = self.services.write().await;
        let entries = services.entry(registration.service_type.clone()).or_default();

        if entries.iter().any(|r| r.host == registration.host) {
            return Err(DiscoveryError::AlreadyRegistered {
                service_type: registration.service_type,
                host: registration.host,
            });
        }

        info!(
            "Registered service '{}' at {}",
            registration.service_type,
            registration.base_url()
        );
        entries.push(registration);
        Ok(())
    }

    async fn unregister(&self, service_type: &str, host: &str) -> Result<(), DiscoveryError> {
        let mut services = self.services.write().await;
        let not_registered = || DiscoveryError::NotRegistered {
            service_type: service_type.to_string(),
            host: host.to_string(),
        };

        let entries = services.get_mut(service_type).ok_or_else(not_registered)?;
        let index = entries
            .iter()
            .position(|r| r.host == host)
            .ok_or_else(not_registered)?;
        entries.remove(index);

        if entries.is_empty() {
            services.remove(service_type);
        }

        info!("Unregistered service '{}' on {}", service_type, host);
        Ok(())
    }

    async fn set_maintenance(&self, host: &str, maintenance: bool) -> Result<(), DiscoveryError> {
        self.update_host(host, |r| r.maintenance = maintenance).await?;
        info!("Set maintenance of {} to {}", host, maintenance);
        Ok(())
    }

    async fn set_active(&self, host: &str, active: bool) -> Result<(), DiscoveryError> {
        self.update_host(host, |r| r.active = active).await?;
        info!("{} host {}", if active { "Enabled" } else { "Disabled" }, host);
        Ok(())
    }

    async fn update_load(
        &self,
        service_type: &str,
        host: &str,
        load: u32,
    ) -> Result<(), DiscoveryError> {
        let mut services = self.services.write().await;
        let registration = services
            .get_mut(service_type)
            .and_then(|entries| entries.iter_mut().find(|r| r.host == host))
            .ok_or_else(|| DiscoveryError::NotRegistered {
                service_type: service_type.to_string(),
                host: host.to_string(),
            })?;
        registration.load = load;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ServiceRegistration>, DiscoveryError> {
        let services = self.services.read().await;
        Ok(services.values().flatten().cloned().collect())
    }

    async fn registrations_by_load(
        &self,
        service_type: &str,
    ) -> Result<Vec<ServiceRegistration>, DiscoveryError> {
        let services = self.services.read().await;
        let mut available: Vec<ServiceRegistration> = services
            .get(service_type)
            .map(|entries| entries.iter().filter(|r| r.is_available()).cloned().collect())
            .unwrap_or_default();

        available.sort_by(|a, b| a.load.cmp(&b.load).then_with(|| a.host.cmp(&b.host)));
        Ok(available)
    }
}
