//! Authenticated HTTP transport used for calls to remote services.

mod client;

pub use client::{
    Transport, TransportConfig, TransportError, TrustedClient, REQUESTED_AUTH_HEADER,
};
