//! Paymail resolution workflow
//!
//! Walks the bsvalias steps for one handle in a single forward pass:
//! validate, discover capabilities, enforce the mandatory endpoints, run the
//! optional sender-validation handshake, fetch the PKI record, request a
//! payment destination, and optionally fetch the public profile. Any failed
//! step aborts the pass; only the profile lookup is allowed to fail softly.

use crate::transport::Transport;
use crate::{Error, Result};
use chrono::{SecondsFormat, Utc};
use paymail_core::{
    CapabilitySet, PaymailHandle, PublicProfile, SenderRequest, BRFC_BASIC_ADDRESS_RESOLUTION,
    BRFC_PAYMENT_DESTINATION, BRFC_PKI, BRFC_PKI_ALTERNATE, BRFC_PUBLIC_PROFILE,
    BRFC_SENDER_VALIDATION,
};
use rand::RngCore;
use tracing::{info, warn};

/// Placeholder signature length in bytes
const FAKE_SIGNATURE_BYTES: usize = 64;

/// Resolution inputs
///
/// Immutable for the duration of one resolution pass.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Amount in satoshis for the payment request
    pub amount: u64,
    /// Purpose for the transaction
    pub purpose: String,
    /// Sender's paymail handle; the receiver is substituted when unset
    pub sender_handle: Option<String>,
    /// Sender's display name
    pub sender_name: String,
    /// Signature of the entire request
    pub signature: Option<String>,
    /// Skip the receiver PKI request
    pub skip_pki: bool,
    /// Skip the public profile request
    pub skip_public_profile: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            amount: 0,
            purpose: String::new(),
            sender_handle: None,
            sender_name: String::new(),
            signature: None,
            skip_pki: false,
            skip_public_profile: false,
        }
    }
}

/// Outcome of a successful resolution
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Receiver handle the resolution ran against
    pub handle: PaymailHandle,
    /// Receiver's public key, absent when the PKI request was skipped
    pub pub_key: Option<String>,
    /// Sender's public key, present when the sender-validation handshake
    /// fetched it
    pub sender_pub_key: Option<String>,
    /// Hex-encoded locking script
    pub output: String,
    /// Address derived from the output script
    pub address: String,
    /// Receiver's public profile, when advertised and fetched
    pub profile: Option<PublicProfile>,
}

/// Paymail resolver
pub struct Resolver<T: Transport> {
    transport: T,
    config: ResolverConfig,
}

impl<T: Transport> Resolver<T> {
    /// Create new resolver
    pub fn new(transport: T, config: ResolverConfig) -> Self {
        Self { transport, config }
    }

    /// Access the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve a receiver address into a payment destination
    pub async fn resolve(&self, address: &str) -> Result<Resolution> {
        let receiver = PaymailHandle::parse(address)?;
        let sender = self.sender_handle(&receiver)?;

        let capabilities = self.transport.get_capabilities(&receiver.domain).await?;

        let pki_url = require_capability(
            &capabilities,
            &receiver.domain,
            BRFC_PKI,
            Some(BRFC_PKI_ALTERNATE),
        )?;
        let resolve_url = require_capability(
            &capabilities,
            &receiver.domain,
            BRFC_PAYMENT_DESTINATION,
            Some(BRFC_BASIC_ADDRESS_RESOLUTION),
        )?;

        let (signature, sender_pub_key) = if capabilities
            .get_bool(BRFC_SENDER_VALIDATION, None)
        {
            self.pre_validate_sender(&receiver, &sender).await?
        } else {
            (self.config.signature.clone().unwrap_or_default(), None)
        };

        let pub_key = if self.config.skip_pki {
            info!("skipping pki request for: {}", receiver);
            None
        } else {
            let pki = self
                .transport
                .get_pki(&pki_url, &receiver.alias, &receiver.domain)
                .await?;
            Some(pki.pubkey)
        };

        let request = SenderRequest {
            amount: self.config.amount,
            dt: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            purpose: self.config.purpose.clone(),
            sender_handle: sender.to_string(),
            sender_name: self.config.sender_name.clone(),
            signature,
        };

        info!("resolving address: {}...", receiver);
        let resolved = self
            .transport
            .resolve_address(&resolve_url, &receiver.alias, &receiver.domain, &request)
            .await?;
        info!("address resolution successful");

        let profile = self.fetch_profile(&capabilities, &receiver).await;

        Ok(Resolution {
            handle: receiver,
            pub_key,
            sender_pub_key,
            output: resolved.output,
            address: resolved.address,
            profile,
        })
    }

    /// Determine the sender handle, defaulting to the receiver
    fn sender_handle(&self, receiver: &PaymailHandle) -> Result<PaymailHandle> {
        match self.config.sender_handle.as_deref() {
            Some(handle) if !handle.is_empty() => Ok(PaymailHandle::parse(handle)?),
            _ => {
                warn!("sender handle not set, using: {}", receiver);
                Ok(receiver.clone())
            }
        }
    }

    /// Sender-validation handshake
    ///
    /// Returns the signature to send and, when the sender differs from the
    /// receiver, the sender's public key.
    async fn pre_validate_sender(
        &self,
        receiver: &PaymailHandle,
        sender: &PaymailHandle,
    ) -> Result<(String, Option<String>)> {
        warn!("sender validation is ENFORCED");

        let signature = match self.config.signature.as_deref() {
            Some(signature) if !signature.is_empty() => signature.to_string(),
            _ => {
                tracing::error!("missing required flag: --signature");
                warn!("attempting to fake a signature for: {}...", sender);
                random_hex(FAKE_SIGNATURE_BYTES)
            }
        };

        let sender_pub_key = if sender != receiver {
            let sender_capabilities = self.transport.get_capabilities(&sender.domain).await?;

            let sender_pki_url = require_capability(
                &sender_capabilities,
                &sender.domain,
                BRFC_PKI,
                Some(BRFC_PKI_ALTERNATE),
            )?;

            let sender_pki = self
                .transport
                .get_pki(&sender_pki_url, &sender.alias, &sender.domain)
                .await?;
            info!("{}'s pubkey: {}", sender, sender_pki.pubkey);

            Some(sender_pki.pubkey)
        } else {
            None
        };

        info!("send request pre-validation: passed");

        Ok((signature, sender_pub_key))
    }

    /// Public profile lookup; failures are reported but never abort
    async fn fetch_profile(
        &self,
        capabilities: &CapabilitySet,
        receiver: &PaymailHandle,
    ) -> Option<PublicProfile> {
        let url = capabilities.get_string(BRFC_PUBLIC_PROFILE, None)?;

        if self.config.skip_public_profile {
            return None;
        }

        info!("getting public profile for: {}...", receiver);
        match self
            .transport
            .get_public_profile(&url, &receiver.alias, &receiver.domain)
            .await
        {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }
}

fn require_capability(
    capabilities: &CapabilitySet,
    domain: &str,
    primary: &str,
    alternate: Option<&str>,
) -> Result<String> {
    capabilities
        .get_string(primary, alternate)
        .ok_or_else(|| Error::MissingCapability {
            domain: domain.to_string(),
            capability: primary.to_string(),
        })
}

/// Random hex string of `byte_len` bytes, used only as the signature
/// placeholder when sender validation demands one we cannot produce
fn random_hex(byte_len: usize) -> String {
    let mut bytes = vec![0u8; byte_len];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
