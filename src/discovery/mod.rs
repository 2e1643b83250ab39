//! Service discovery for locating remote service instances.
//!
//! A [`ServiceRegistry`] knows which hosts offer which service types and
//! how busy they are. The proxy only ever asks it for the least loaded
//! available instance of one service type.

mod registry;

pub use registry::{DiscoveryError, MemoryRegistry, ServiceRegistration, ServiceRegistry};
