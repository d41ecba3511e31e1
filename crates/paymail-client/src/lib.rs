//! Paymail service discovery and address resolution
//!
//! Provides the HTTP transport for the bsvalias endpoints (capability
//! discovery, PKI, payment destination, public profile) and the resolver
//! that walks them in order for a single handle.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod resolver;
pub mod srv;
pub mod transport;

pub use client::{ClientConfig, PaymailClient};
pub use error::{Error, Result};
pub use resolver::{Resolution, Resolver, ResolverConfig};
pub use srv::{DnsProvider, SrvRecord, SrvResolver, BSVALIAS_SERVICE};
pub use transport::Transport;
