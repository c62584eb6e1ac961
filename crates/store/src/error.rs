//! Error taxonomy shared by the store adapter and everything above it
//!
//! Errors are created once at the layer that detects them and propagate
//! unchanged to the HTTP boundary, where each variant maps to a single
//! status code and human-readable message.

use thiserror::Error;

/// Errors produced by object-store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed client request (empty name, missing id, bad type tag).
    /// Reported before any network call is made.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Required credential or root-folder configuration is missing.
    /// Fatal at startup; never produced per-request.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// The remote store rejected or could not complete a request
    /// (auth failure, quota, invalid parent, network fault).
    #[error("upstream store error: {0}")]
    Upstream(String),

    /// The object id no longer exists upstream at mutation time.
    #[error("not found: {0}")]
    NotFound(String),
}

impl StoreError {
    /// Validation failure with a formatted message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Upstream failure with a formatted message
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Missing-object failure for the given id
    pub fn not_found(id: &str) -> Self {
        Self::NotFound(format!("object {id} does not exist"))
    }

    /// Whether this error means "the object was already gone"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Convenience alias used throughout the store crate
pub type Result<T> = std::result::Result<T, StoreError>;
