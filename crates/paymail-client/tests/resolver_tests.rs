//! Resolver workflow tests against a deterministic mock transport
//!
//! Every test asserts both the outcome and the exact transport calls made,
//! since the workflow's value is in which endpoints it does and does not hit.

use async_trait::async_trait;
use paymail_client::{Error, Resolver, ResolverConfig, Transport};
use paymail_core::{CapabilitySet, PkiResponse, PublicProfile, ResolutionResponse, SenderRequest};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

const OUTPUT_SCRIPT: &str = "76a914f32281faa74e2ac037493f04d3d3b91e9b3c8e8588ac";
const ADDRESS: &str = "1PNyRnYvQxvJ7eVw6vjJbXJVhT3eCAHVRR";

// ============================================================================
// Mock transport
// ============================================================================

#[derive(Default)]
struct MockTransport {
    capabilities: HashMap<String, CapabilitySet>,
    timeout_domains: HashSet<String>,
    fail_profile: bool,
    calls: Mutex<Vec<String>>,
    last_request: Mutex<Option<SenderRequest>>,
}

impl MockTransport {
    fn with_capabilities(domain: &str, value: serde_json::Value) -> Self {
        let mut transport = Self::default();
        transport.add_domain(domain, value);
        transport
    }

    fn add_domain(&mut self, domain: &str, value: serde_json::Value) {
        self.capabilities
            .insert(domain.to_string(), serde_json::from_value(value).unwrap());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn sent_request(&self) -> Option<SenderRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_capabilities(&self, domain: &str) -> paymail_client::Result<CapabilitySet> {
        self.record(format!("capabilities:{}", domain));

        if self.timeout_domains.contains(domain) {
            return Err(Error::DiscoveryTimeout(domain.to_string()));
        }

        self.capabilities
            .get(domain)
            .cloned()
            .ok_or_else(|| Error::Discovery(format!("unknown domain: {}", domain)))
    }

    async fn get_pki(
        &self,
        _url_template: &str,
        alias: &str,
        domain: &str,
    ) -> paymail_client::Result<PkiResponse> {
        self.record(format!("pki:{}@{}", alias, domain));

        Ok(PkiResponse {
            bsvalias: "1.0".to_string(),
            handle: format!("{}@{}", alias, domain),
            pubkey: format!("02pubkeyfor{}at{}", alias, domain),
        })
    }

    async fn resolve_address(
        &self,
        _url_template: &str,
        alias: &str,
        domain: &str,
        request: &SenderRequest,
    ) -> paymail_client::Result<ResolutionResponse> {
        self.record(format!("resolve:{}@{}", alias, domain));
        *self.last_request.lock().unwrap() = Some(request.clone());

        Ok(ResolutionResponse {
            output: OUTPUT_SCRIPT.to_string(),
            address: ADDRESS.to_string(),
        })
    }

    async fn get_public_profile(
        &self,
        _url_template: &str,
        alias: &str,
        domain: &str,
    ) -> paymail_client::Result<PublicProfile> {
        self.record(format!("profile:{}@{}", alias, domain));

        if self.fail_profile {
            return Err(Error::Profile("connection reset".to_string()));
        }

        Ok(PublicProfile {
            name: "Alice Example".to_string(),
            avatar: "https://example.com/avatar.png".to_string(),
        })
    }
}

fn basic_capabilities() -> serde_json::Value {
    json!({
        "bsvalias": "1.0",
        "capabilities": {
            "pki": "https://example.com/{alias}@{domain.tld}/id",
            "paymentDestination": "https://example.com/{alias}@{domain.tld}/payment-destination"
        }
    })
}

fn capabilities_with(extra: &[(&str, serde_json::Value)]) -> serde_json::Value {
    let mut value = basic_capabilities();
    for (id, capability) in extra {
        value["capabilities"][id] = capability.clone();
    }
    value
}

// ============================================================================
// Validation gate
// ============================================================================

#[tokio::test]
async fn invalid_receiver_makes_no_transport_calls() {
    let transport = MockTransport::default();
    let resolver = Resolver::new(transport, ResolverConfig::default());

    let result = resolver.resolve("not-a-paymail").await;

    assert!(matches!(result, Err(Error::Validation(_))));
    assert!(resolver_calls(&resolver).is_empty());
}

#[tokio::test]
async fn invalid_sender_makes_no_transport_calls() {
    let transport = MockTransport::with_capabilities("example.com", basic_capabilities());
    let config = ResolverConfig {
        sender_handle: Some("bad handle@".to_string()),
        ..ResolverConfig::default()
    };
    let resolver = Resolver::new(transport, config);

    let result = resolver.resolve("alice@example.com").await;

    assert!(matches!(result, Err(Error::Validation(_))));
    assert!(resolver_calls(&resolver).is_empty());
}

// ============================================================================
// Capability requirements
// ============================================================================

#[tokio::test]
async fn missing_resolution_capability_aborts() {
    let transport = MockTransport::with_capabilities(
        "example.com",
        json!({
            "bsvalias": "1.0",
            "capabilities": {
                "pki": "https://example.com/{alias}@{domain.tld}/id",
                "f12f968c92d6": "https://example.com/{alias}@{domain.tld}/profile"
            }
        }),
    );
    let resolver = Resolver::new(transport, ResolverConfig::default());

    let error = resolver.resolve("alice@example.com").await.unwrap_err();

    match error {
        Error::MissingCapability { domain, capability } => {
            assert_eq!(domain, "example.com");
            assert_eq!(capability, "paymentDestination");
        }
        other => panic!("expected MissingCapability, got: {}", other),
    }
    // Discovery happened, nothing else did
    assert_eq!(resolver_calls(&resolver), vec!["capabilities:example.com"]);
}

#[tokio::test]
async fn missing_pki_capability_aborts() {
    let transport = MockTransport::with_capabilities(
        "example.com",
        json!({
            "bsvalias": "1.0",
            "capabilities": {
                "paymentDestination": "https://example.com/{alias}@{domain.tld}/payment-destination"
            }
        }),
    );
    let resolver = Resolver::new(transport, ResolverConfig::default());

    let error = resolver.resolve("alice@example.com").await.unwrap_err();
    assert!(error.to_string().contains("0c4339ef99c9"));
}

#[tokio::test]
async fn pki_capability_found_under_alternate_id() {
    let transport = MockTransport::with_capabilities(
        "example.com",
        json!({
            "bsvalias": "1.0",
            "capabilities": {
                "0c4339ef99c9": "https://example.com/{alias}@{domain.tld}/id",
                "759684b1a19a": "https://example.com/{alias}@{domain.tld}/payment-destination"
            }
        }),
    );
    let resolver = Resolver::new(transport, ResolverConfig::default());

    let resolution = resolver.resolve("alice@example.com").await.unwrap();
    assert_eq!(resolution.output, OUTPUT_SCRIPT);
}

#[tokio::test]
async fn discovery_timeout_is_a_warning() {
    let mut transport = MockTransport::default();
    transport.timeout_domains.insert("example.com".to_string());
    let resolver = Resolver::new(transport, ResolverConfig::default());

    let error = resolver.resolve("alice@example.com").await.unwrap_err();

    assert!(error.is_warning());
    assert_eq!(error.to_string(), "no capabilities found for: example.com");
}

// ============================================================================
// Sender validation branch
// ============================================================================

#[tokio::test]
async fn sender_validation_with_defaulted_sender_skips_secondary_discovery() {
    let transport = MockTransport::with_capabilities(
        "example.com",
        capabilities_with(&[("6745385c3fc0", json!(true))]),
    );
    let resolver = Resolver::new(transport, ResolverConfig::default());

    let resolution = resolver.resolve("alice@example.com").await.unwrap();

    assert!(resolution.sender_pub_key.is_none());
    assert_eq!(
        resolver_calls(&resolver),
        vec![
            "capabilities:example.com",
            "pki:alice@example.com",
            "resolve:alice@example.com",
        ]
    );
}

#[tokio::test]
async fn sender_validation_with_distinct_sender_fetches_sender_pki() {
    let mut transport = MockTransport::with_capabilities(
        "example.com",
        capabilities_with(&[("6745385c3fc0", json!(true))]),
    );
    transport.add_domain(
        "sender.org",
        json!({
            "bsvalias": "1.0",
            "capabilities": {
                "pki": "https://sender.org/{alias}@{domain.tld}/id"
            }
        }),
    );

    let config = ResolverConfig {
        sender_handle: Some("bob@sender.org".to_string()),
        ..ResolverConfig::default()
    };
    let resolver = Resolver::new(transport, config);

    let resolution = resolver.resolve("alice@example.com").await.unwrap();

    assert_eq!(
        resolution.sender_pub_key.as_deref(),
        Some("02pubkeyforbobatsender.org")
    );
    assert_eq!(
        resolver_calls(&resolver),
        vec![
            "capabilities:example.com",
            "capabilities:sender.org",
            "pki:bob@sender.org",
            "pki:alice@example.com",
            "resolve:alice@example.com",
        ]
    );
}

#[tokio::test]
async fn missing_signature_is_replaced_by_placeholder() {
    let mut transport = MockTransport::with_capabilities(
        "example.com",
        capabilities_with(&[("6745385c3fc0", json!(true))]),
    );
    transport.add_domain(
        "sender.org",
        json!({
            "bsvalias": "1.0",
            "capabilities": {
                "pki": "https://sender.org/{alias}@{domain.tld}/id"
            }
        }),
    );

    let config = ResolverConfig {
        sender_handle: Some("bob@sender.org".to_string()),
        ..ResolverConfig::default()
    };
    let resolver = Resolver::new(transport, config);

    resolver.resolve("alice@example.com").await.unwrap();

    let request = sent_request(&resolver).unwrap();
    assert_eq!(request.signature.len(), 128);
    assert!(request.signature.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn supplied_signature_is_passed_through() {
    let transport = MockTransport::with_capabilities(
        "example.com",
        capabilities_with(&[("6745385c3fc0", json!(true))]),
    );
    let config = ResolverConfig {
        signature: Some("3045022100cafe".to_string()),
        ..ResolverConfig::default()
    };
    let resolver = Resolver::new(transport, config);

    resolver.resolve("alice@example.com").await.unwrap();

    let request = sent_request(&resolver).unwrap();
    assert_eq!(request.signature, "3045022100cafe");
}

#[tokio::test]
async fn sender_domain_discovery_failure_aborts() {
    let mut transport = MockTransport::with_capabilities(
        "example.com",
        capabilities_with(&[("6745385c3fc0", json!(true))]),
    );
    transport.timeout_domains.insert("sender.org".to_string());

    let config = ResolverConfig {
        sender_handle: Some("bob@sender.org".to_string()),
        ..ResolverConfig::default()
    };
    let resolver = Resolver::new(transport, config);

    let error = resolver.resolve("alice@example.com").await.unwrap_err();
    assert!(matches!(error, Error::DiscoveryTimeout(domain) if domain == "sender.org"));
}

// ============================================================================
// Skip flags
// ============================================================================

#[tokio::test]
async fn skip_pki_omits_the_pki_request() {
    let transport = MockTransport::with_capabilities("example.com", basic_capabilities());
    let config = ResolverConfig {
        skip_pki: true,
        ..ResolverConfig::default()
    };
    let resolver = Resolver::new(transport, config);

    let resolution = resolver.resolve("alice@example.com").await.unwrap();

    assert!(resolution.pub_key.is_none());
    assert_eq!(
        resolver_calls(&resolver),
        vec!["capabilities:example.com", "resolve:alice@example.com"]
    );
}

#[tokio::test]
async fn skip_public_profile_omits_the_profile_request() {
    let transport = MockTransport::with_capabilities(
        "example.com",
        capabilities_with(&[(
            "f12f968c92d6",
            json!("https://example.com/{alias}@{domain.tld}/profile"),
        )]),
    );
    let config = ResolverConfig {
        skip_public_profile: true,
        ..ResolverConfig::default()
    };
    let resolver = Resolver::new(transport, config);

    let resolution = resolver.resolve("alice@example.com").await.unwrap();

    assert!(resolution.profile.is_none());
    assert!(!resolver_calls(&resolver)
        .iter()
        .any(|call| call.starts_with("profile:")));
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[tokio::test]
async fn basic_resolution_end_to_end() {
    let transport = MockTransport::with_capabilities("example.com", basic_capabilities());
    let resolver = Resolver::new(transport, ResolverConfig::default());

    let resolution = resolver.resolve("alice@example.com").await.unwrap();

    assert_eq!(
        resolution.pub_key.as_deref(),
        Some("02pubkeyforaliceatexample.com")
    );
    assert_eq!(resolution.output, OUTPUT_SCRIPT);
    assert_eq!(resolution.address, ADDRESS);
    assert!(resolution.profile.is_none());
    assert!(resolution.sender_pub_key.is_none());
    assert_eq!(
        resolver_calls(&resolver),
        vec![
            "capabilities:example.com",
            "pki:alice@example.com",
            "resolve:alice@example.com",
        ]
    );

    let request = sent_request(&resolver).unwrap();
    assert_eq!(request.amount, 0);
    assert!(request.purpose.is_empty());
    assert_eq!(request.sender_handle, "alice@example.com");
    assert!(request.signature.is_empty());
}

#[tokio::test]
async fn profile_fetch_error_does_not_abort() {
    let mut transport = MockTransport::with_capabilities(
        "example.com",
        capabilities_with(&[(
            "f12f968c92d6",
            json!("https://example.com/{alias}@{domain.tld}/profile"),
        )]),
    );
    transport.fail_profile = true;
    let resolver = Resolver::new(transport, ResolverConfig::default());

    let resolution = resolver.resolve("alice@example.com").await.unwrap();

    assert!(resolution.profile.is_none());
    assert_eq!(resolution.output, OUTPUT_SCRIPT);
    assert_eq!(resolution.address, ADDRESS);
    assert!(resolver_calls(&resolver)
        .iter()
        .any(|call| call == "profile:alice@example.com"));
}

#[tokio::test]
async fn profile_is_fetched_when_advertised() {
    let transport = MockTransport::with_capabilities(
        "example.com",
        capabilities_with(&[(
            "f12f968c92d6",
            json!("https://example.com/{alias}@{domain.tld}/profile"),
        )]),
    );
    let resolver = Resolver::new(transport, ResolverConfig::default());

    let resolution = resolver.resolve("alice@example.com").await.unwrap();

    let profile = resolution.profile.unwrap();
    assert_eq!(profile.name, "Alice Example");
    assert_eq!(profile.avatar, "https://example.com/avatar.png");
}

#[tokio::test]
async fn resolution_is_deterministic_apart_from_dt() {
    let transport = MockTransport::with_capabilities("example.com", basic_capabilities());
    let resolver = Resolver::new(transport, ResolverConfig::default());

    let first = resolver.resolve("alice@example.com").await.unwrap();
    let second = resolver.resolve("alice@example.com").await.unwrap();

    assert_eq!(first.output, second.output);
    assert_eq!(first.address, second.address);
    assert_eq!(first.pub_key, second.pub_key);
}

// ============================================================================
// Helpers
// ============================================================================

fn resolver_calls(resolver: &Resolver<MockTransport>) -> Vec<String> {
    resolver.transport().calls()
}

fn sent_request(resolver: &Resolver<MockTransport>) -> Option<SenderRequest> {
    resolver.transport().sent_request()
}
