//! HTTP transport for the bsvalias endpoints

use crate::srv::{DnsProvider, SrvResolver};
use crate::transport::Transport;
use crate::{Error, Result};
use async_trait::async_trait;
use paymail_core::{CapabilitySet, PkiResponse, PublicProfile, ResolutionResponse, SenderRequest};
use std::time::Duration;
use tracing::{debug, warn};

/// Well-known path serving a provider's capability document
pub const WELL_KNOWN_PATH: &str = "/.well-known/bsvalias";

/// Default per-request deadline
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Paymail client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User-Agent header for HTTP requests
    pub user_agent: String,
    /// Per-request deadline
    pub timeout: Duration,
    /// DoH provider for SRV lookups
    pub dns_provider: DnsProvider,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("paymail-inspector/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            dns_provider: DnsProvider::CloudflareDoH,
        }
    }
}

/// Paymail HTTP client
#[derive(Clone)]
pub struct PaymailClient {
    http: reqwest::Client,
    srv: SrvResolver,
}

impl PaymailClient {
    /// Create new client
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        let srv = SrvResolver::new(config.dns_provider, http.clone());

        Ok(Self { http, srv })
    }

    /// Build the capabilities URL for a domain, honoring its SRV record
    async fn capabilities_url(&self, domain: &str) -> String {
        let (host, port) = match self.srv.lookup(domain).await {
            Some(record) => (record.target, record.port),
            None => {
                debug!("no SRV record for {}, using domain directly", domain);
                (domain.to_string(), 443)
            }
        };

        if port == 443 {
            format!("https://{}{}", host, WELL_KNOWN_PATH)
        } else {
            format!("https://{}:{}{}", host, port, WELL_KNOWN_PATH)
        }
    }

    async fn get_json<R>(&self, url: &str, on_error: impl Fn(String) -> Error) -> Result<R>
    where
        R: for<'de> serde::Deserialize<'de>,
    {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| on_error(format!("HTTP error: {}", e)))?;

        if !response.status().is_success() {
            return Err(on_error(format!("HTTP error: {}", response.status())));
        }

        response
            .json()
            .await
            .map_err(|e| on_error(format!("JSON decode error: {}", e)))
    }
}

#[async_trait]
impl Transport for PaymailClient {
    async fn get_capabilities(&self, domain: &str) -> Result<CapabilitySet> {
        let url = self.capabilities_url(domain).await;
        debug!("discovering capabilities: {}", url);

        let response = self.http.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::DiscoveryTimeout(domain.to_string())
            } else {
                Error::Discovery(format!("HTTP error: {}", e))
            }
        })?;

        if !response.status().is_success() {
            return Err(Error::Discovery(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let capabilities: CapabilitySet = response
            .json()
            .await
            .map_err(|e| Error::Discovery(format!("JSON decode error: {}", e)))?;

        if capabilities.capabilities.is_empty() {
            warn!("{} advertises an empty capability set", domain);
        }

        Ok(capabilities)
    }

    async fn get_pki(
        &self,
        url_template: &str,
        alias: &str,
        domain: &str,
    ) -> Result<PkiResponse> {
        let url = apply_template(url_template, alias, domain);
        debug!("fetching pki: {}", url);
        self.get_json(&url, Error::Pki).await
    }

    async fn resolve_address(
        &self,
        url_template: &str,
        alias: &str,
        domain: &str,
        request: &SenderRequest,
    ) -> Result<ResolutionResponse> {
        let url = apply_template(url_template, alias, domain);
        debug!("posting address resolution: {}", url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Resolution(format!("HTTP error: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Resolution(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Resolution(format!("JSON decode error: {}", e)))
    }

    async fn get_public_profile(
        &self,
        url_template: &str,
        alias: &str,
        domain: &str,
    ) -> Result<PublicProfile> {
        let url = apply_template(url_template, alias, domain);
        debug!("fetching public profile: {}", url);
        self.get_json(&url, Error::Profile).await
    }
}

/// Substitute the `{alias}` / `{domain.tld}` placeholders of a capability URL
fn apply_template(template: &str, alias: &str, domain: &str) -> String {
    template
        .replace("{alias}", alias)
        .replace("{domain.tld}", domain)
}
