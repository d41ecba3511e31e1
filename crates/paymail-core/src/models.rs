//! Wire types exchanged with paymail providers

use serde::{Deserialize, Serialize};

/// Sender request body posted during address resolution
///
/// Built fresh per resolution attempt and immutable once sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderRequest {
    /// Amount in satoshis (0 when the sender has no specific amount)
    pub amount: u64,
    /// Request timestamp, RFC3339 in UTC
    pub dt: String,
    /// Human-readable purpose for the payment
    pub purpose: String,
    /// Sender's own paymail handle
    pub sender_handle: String,
    /// Sender's display name
    pub sender_name: String,
    /// Signature over the request (placeholder when faked)
    pub signature: String,
}

/// Response from a provider's PKI endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PkiResponse {
    /// bsvalias specification version
    #[serde(default)]
    pub bsvalias: String,
    /// Handle the key belongs to
    #[serde(default)]
    pub handle: String,
    /// Hex-encoded compressed public key
    #[serde(default)]
    pub pubkey: String,
}

/// Response from a provider's payment destination endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResponse {
    /// Hex-encoded locking script
    pub output: String,
    /// Address derived from the output script
    #[serde(default)]
    pub address: String,
}

/// Response from a provider's public profile endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicProfile {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Avatar URL
    #[serde(default)]
    pub avatar: String,
}
