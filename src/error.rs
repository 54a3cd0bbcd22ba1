//! Error types for the meshgate webhook

use thiserror::Error;

/// Main error type for meshgate operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Kubernetes API error
    #[error("kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Admission rule rejection
    ///
    /// The message is returned verbatim as the denial reason; callers parse
    /// these strings, so they are part of the external contract.
    #[error("{0}")]
    Validation(String),

    /// Admission payload could not be decoded into the expected resource
    ///
    /// This is a client/transport defect, not a rule violation, and is kept
    /// distinguishable from [`Error::Validation`] so callers can alert on it.
    #[error("failed to decode admission payload: {0}")]
    Decode(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Object cache lookup or watch failure
    #[error("cache error: {0}")]
    Cache(String),
}

impl Error {
    /// Create a validation error with the given rejection reason
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a decode error with the given message
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a cache error with the given message
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    /// Returns true if this error is an admission rule rejection
    ///
    /// Rule rejections are routine outcomes; everything else indicates a
    /// defect somewhere (malformed payload, API failure, broken watch).
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
