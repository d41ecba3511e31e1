//! Paymail protocol core
//!
//! This crate implements the bsvalias data model: handle parsing and
//! validation, BRFC capability identifiers, capability sets, and the wire
//! types exchanged during address resolution.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod brfc;
pub mod capabilities;
pub mod error;
pub mod handle;
pub mod models;

pub use brfc::{
    BRFC_BASIC_ADDRESS_RESOLUTION, BRFC_PAYMENT_DESTINATION, BRFC_PKI, BRFC_PKI_ALTERNATE,
    BRFC_PUBLIC_PROFILE, BRFC_SENDER_VALIDATION,
};
pub use capabilities::CapabilitySet;
pub use error::{Error, Result};
pub use handle::PaymailHandle;
pub use models::{PkiResponse, PublicProfile, ResolutionResponse, SenderRequest};
