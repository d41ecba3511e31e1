//! Transport contract for the bsvalias endpoints

use crate::Result;
use async_trait::async_trait;
use paymail_core::{CapabilitySet, PkiResponse, PublicProfile, ResolutionResponse, SenderRequest};

/// HTTP collaborator consumed by the resolver
///
/// Implemented by [`crate::PaymailClient`] for real providers and by mocks in
/// tests. Endpoint URL templates come from a previously discovered
/// [`CapabilitySet`] and carry `{alias}` / `{domain.tld}` placeholders.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Discover the capability set advertised by a domain
    ///
    /// A deadline overrun must surface as [`crate::Error::DiscoveryTimeout`]
    /// so callers can distinguish an unreachable provider from a broken one.
    async fn get_capabilities(&self, domain: &str) -> Result<CapabilitySet>;

    /// Fetch the public key record for a handle
    async fn get_pki(&self, url_template: &str, alias: &str, domain: &str)
        -> Result<PkiResponse>;

    /// Request a payment destination for a handle
    async fn resolve_address(
        &self,
        url_template: &str,
        alias: &str,
        domain: &str,
        request: &SenderRequest,
    ) -> Result<ResolutionResponse>;

    /// Fetch the public profile for a handle
    async fn get_public_profile(
        &self,
        url_template: &str,
        alias: &str,
        domain: &str,
    ) -> Result<PublicProfile>;
}
