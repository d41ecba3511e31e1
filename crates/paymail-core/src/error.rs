//! Error types

/// Paymail core errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid paymail handle
    #[error("Invalid paymail handle: {0}")]
    InvalidHandle(String),

    /// Invalid domain name
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
