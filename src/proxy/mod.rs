//! Endpoints that relay requests to services located through discovery.

pub mod error;
pub mod feeds;
pub mod remote;

pub use error::UpstreamFailure;
pub use feeds::{FeedProxy, FEEDS_PATH};
pub use remote::RemoteService;
