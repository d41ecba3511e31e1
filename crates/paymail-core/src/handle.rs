//! Paymail handle parsing and validation
//!
//! A handle is the email-like `alias@domain.tld` form. Parsing lower-cases
//! the input and rejects anything that could not name a provider endpoint.

use crate::{Error, Result};
use std::fmt;

/// Maximum total length of a hostname
const MAX_DOMAIN_LENGTH: usize = 253;

/// Maximum length of a single hostname label
const MAX_LABEL_LENGTH: usize = 63;

/// A parsed paymail handle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymailHandle {
    /// Local part before the `@`
    pub alias: String,
    /// Provider domain after the `@`
    pub domain: String,
}

impl PaymailHandle {
    /// Parse and validate an `alias@domain.tld` address
    pub fn parse(address: &str) -> Result<Self> {
        let address = address.trim().to_lowercase();

        let (alias, domain) = address
            .split_once('@')
            .ok_or_else(|| Error::InvalidHandle(format!("missing @ in: {}", address)))?;

        if alias.is_empty() {
            return Err(Error::InvalidHandle(format!("empty alias in: {}", address)));
        }
        if domain.is_empty() {
            return Err(Error::InvalidHandle(format!("empty domain in: {}", address)));
        }
        if domain.contains('@') {
            return Err(Error::InvalidHandle(format!(
                "multiple @ signs in: {}",
                address
            )));
        }

        validate_alias(alias)?;
        validate_domain(domain)?;

        Ok(Self {
            alias: alias.to_string(),
            domain: domain.to_string(),
        })
    }
}

impl fmt::Display for PaymailHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.alias, self.domain)
    }
}

fn validate_alias(alias: &str) -> Result<()> {
    let valid = alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+'));

    if !valid {
        return Err(Error::InvalidHandle(format!(
            "alias contains invalid characters: {}",
            alias
        )));
    }

    Ok(())
}

/// Validate hostname syntax for a paymail provider domain
pub fn validate_domain(domain: &str) -> Result<()> {
    if domain.len() > MAX_DOMAIN_LENGTH {
        return Err(Error::InvalidDomain(format!("domain too long: {}", domain)));
    }

    let labels: Vec<&str> = domain.split('.').collect();

    // A provider domain needs at least domain.tld
    if labels.len() < 2 {
        return Err(Error::InvalidDomain(format!("missing tld in: {}", domain)));
    }

    for label in &labels {
        if label.is_empty() || label.len() > MAX_LABEL_LENGTH {
            return Err(Error::InvalidDomain(format!(
                "invalid label length in: {}",
                domain
            )));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::InvalidDomain(format!(
                "label cannot start or end with hyphen: {}",
                domain
            )));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(Error::InvalidDomain(format!(
                "invalid characters in: {}",
                domain
            )));
        }
    }

    let tld = labels[labels.len() - 1];
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidDomain(format!("invalid tld in: {}", domain)));
    }

    Ok(())
}
