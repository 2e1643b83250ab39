//! Transport-neutral HTTP values passed between the proxy and its collaborators.

mod request;
mod response;

pub use request::ProxyRequest;
pub use response::{ProxyResponse, StatusCode};
