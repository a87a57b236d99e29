//! Error types for the client layer
//!
//! Transport failures are never surfaced through this type: they are folded
//! into the [`Envelope`](crate::Envelope) returned by every call. The `Error`
//! enum covers the remaining failure modes — invalid request construction and
//! interceptor failures — which reject the call before or after the attempt
//! loop runs.

use thiserror::Error;

/// Result type alias for operations that can fail with a client error.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for request construction and interceptor failures.
#[derive(Debug, Error)]
pub enum Error {
    /// The endpoint could not be resolved to a valid absolute URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name or value failed HTTP validation.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// The request configuration was rejected before dispatch.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The underlying HTTP client could not be configured or initialized.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// A request or response interceptor failed.
    #[error("interceptor error: {0}")]
    Interceptor(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other errors not covered by specific variants.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
