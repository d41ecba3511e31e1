//! Error types

/// Resolution errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Handle or domain failed syntax validation
    #[error(transparent)]
    Validation(#[from] paymail_core::Error),

    /// Capability discovery exceeded its deadline
    #[error("no capabilities found for: {0}")]
    DiscoveryTimeout(String),

    /// Capability discovery failed
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// A mandatory capability is absent from the discovered set
    #[error("{domain} is missing a required capability: {capability}")]
    MissingCapability {
        /// Domain whose capability set was inspected
        domain: String,
        /// Identifier of the absent capability
        capability: String,
    },

    /// PKI request failed
    #[error("PKI request failed: {0}")]
    Pki(String),

    /// Address resolution request failed
    #[error("address resolution failed: {0}")]
    Resolution(String),

    /// Public profile request failed
    #[error("get public profile failed: {0}")]
    Profile(String),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Http(String),
}

impl Error {
    /// Check if the error should be reported as a warning rather than an
    /// error (a discovery deadline means the domain simply has no reachable
    /// paymail service)
    pub fn is_warning(&self) -> bool {
        matches!(self, Error::DiscoveryTimeout(_))
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
