//! SRV lookup for paymail service discovery via DNS-over-HTTPS
//!
//! Providers may delegate their bsvalias host through an SRV record at
//! `_bsvalias._tcp.<domain>`. Lookups go over DoH; when no record exists the
//! caller falls back to the domain itself.

use tracing::{debug, warn};

/// SRV service name for bsvalias discovery
pub const BSVALIAS_SERVICE: &str = "_bsvalias._tcp";

/// DNS resolver provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnsProvider {
    /// Cloudflare DoH (1.1.1.1)
    CloudflareDoH,
    /// Quad9 DoH (9.9.9.9)
    Quad9DoH,
    /// Google DoH (8.8.8.8)
    GoogleDoH,
    /// Custom DoH endpoint
    CustomDoH(String),
}

impl DnsProvider {
    /// Get DoH endpoint URL
    pub fn doh_url(&self) -> String {
        match self {
            Self::CloudflareDoH => "https://cloudflare-dns.com/dns-query".to_string(),
            Self::Quad9DoH => "https://dns.quad9.net/dns-query".to_string(),
            Self::GoogleDoH => "https://dns.google/dns-query".to_string(),
            Self::CustomDoH(url) => url.clone(),
        }
    }

    /// Get provider name for display
    pub fn name(&self) -> &str {
        match self {
            Self::CloudflareDoH => "Cloudflare (1.1.1.1)",
            Self::Quad9DoH => "Quad9 (9.9.9.9)",
            Self::GoogleDoH => "Google (8.8.8.8)",
            Self::CustomDoH(_) => "Custom DoH",
        }
    }
}

/// A single SRV answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvRecord {
    /// Target hostname
    pub target: String,
    /// Target port
    pub port: u16,
    /// Record priority (lower wins)
    pub priority: u16,
    /// Record weight (higher wins within a priority)
    pub weight: u16,
}

/// SRV resolver over DoH
#[derive(Clone)]
pub struct SrvResolver {
    provider: DnsProvider,
    client: reqwest::Client,
}

impl SrvResolver {
    /// Create new SRV resolver sharing the given HTTP client
    pub fn new(provider: DnsProvider, client: reqwest::Client) -> Self {
        Self { provider, client }
    }

    /// Look up the bsvalias SRV record for a domain
    ///
    /// Returns `None` when the domain publishes no record or the lookup
    /// fails; discovery then targets the domain directly.
    pub async fn lookup(&self, domain: &str) -> Option<SrvRecord> {
        let name = format!("{}.{}", BSVALIAS_SERVICE, domain);
        let query_url = format!("{}?name={}&type=SRV", self.provider.doh_url(), name);

        debug!("SRV lookup: {} via {}", name, self.provider.name());

        let response = match self
            .client
            .get(&query_url)
            .header("Accept", "application/dns-json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("SRV query failed for {}: {}", name, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "SRV query failed with status {} for {}",
                response.status(),
                name
            );
            return None;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read SRV response for {}: {}", name, e);
                return None;
            }
        };

        let record = pick_record(parse_srv_response(&body));
        debug!("SRV answer for {}: {:?}", name, record);
        record
    }

    /// Get current provider
    pub fn provider(&self) -> &DnsProvider {
        &self.provider
    }
}

#[derive(serde::Deserialize)]
struct DohResponse {
    #[serde(rename = "Answer")]
    answer: Option<Vec<DohAnswer>>,
}

#[derive(serde::Deserialize)]
struct DohAnswer {
    #[serde(rename = "data")]
    data: String,
}

fn parse_srv_response(body: &str) -> Vec<SrvRecord> {
    let parsed: std::result::Result<DohResponse, serde_json::Error> = serde_json::from_str(body);
    let Ok(response) = parsed else {
        return Vec::new();
    };

    response
        .answer
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| parse_srv_data(&entry.data))
        .collect()
}

/// Parse the RDATA form "priority weight port target."
fn parse_srv_data(data: &str) -> Option<SrvRecord> {
    let mut parts = data.split_whitespace();
    let priority = parts.next()?.parse().ok()?;
    let weight = parts.next()?.parse().ok()?;
    let port = parts.next()?.parse().ok()?;
    let target = parts.next()?.trim_end_matches('.').to_string();

    if target.is_empty() || parts.next().is_some() {
        return None;
    }

    Some(SrvRecord {
        target,
        port,
        priority,
        weight,
    })
}

fn pick_record(mut records: Vec<SrvRecord>) -> Option<SrvRecord> {
    records.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(b.weight.cmp(&a.weight))
    });
    records.into_iter().next()
}
