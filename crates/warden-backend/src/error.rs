//! Error types for the backend client.

use std::time::Duration;

use warden_protocol::ProtocolError;

/// Errors that can occur while talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request itself failed: DNS, connection refused, reset.
    #[cfg(feature = "http")]
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// No response within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The backend answered with a non-2xx status.
    /// The body is kept because error responses often explain themselves
    /// (`{"detail": "..."}`).
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request could not be encoded or the response not decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The client was configured with something unusable (bad base URL).
    #[error("invalid backend configuration: {0}")]
    Config(String),
}

impl BackendError {
    /// Whether this failure was the request running out of time.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            #[cfg(feature = "http")]
            Self::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
