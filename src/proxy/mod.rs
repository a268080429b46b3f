//! Forwarding proxy.
//!
//! A stateless relay: requests arriving under a configured ingress prefix
//! are forwarded to one fixed upstream origin, and the upstream's response
//! is returned untouched apart from CORS headers. The upstream leg sits
//! behind the [`Upstream`] trait so tests can count calls without a network.

pub mod forwarder;
pub mod server;

pub use forwarder::{HttpUpstream, Upstream, UpstreamRequest, UpstreamResponse};
pub use server::{ProxyState, bind, build_router, parse_bind_addr};
