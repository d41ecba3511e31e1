//! BRFC capability identifiers
//!
//! Capability discovery keys providers advertise in their well-known
//! document. Most capabilities are named by BRFC id; a few early ones also
//! go by a well-known alias.

/// Public key infrastructure endpoint
pub const BRFC_PKI: &str = "0c4339ef99c9";

/// Well-known alias for the PKI capability
pub const BRFC_PKI_ALTERNATE: &str = "pki";

/// Payment destination endpoint (well-known alias form)
pub const BRFC_PAYMENT_DESTINATION: &str = "paymentDestination";

/// Basic address resolution endpoint (BRFC id form of payment destination)
pub const BRFC_BASIC_ADDRESS_RESOLUTION: &str = "759684b1a19a";

/// Sender validation enforcement flag
pub const BRFC_SENDER_VALIDATION: &str = "6745385c3fc0";

/// Public profile endpoint
pub const BRFC_PUBLIC_PROFILE: &str = "f12f968c92d6";
