//! Unified error type for Warden.

use warden_backend::BackendError;
use warden_protocol::ProtocolError;
use warden_session::SessionError;

use crate::ConfigError;

/// Top-level error wrapping every crate-specific error.
///
/// Embedders using the `warden` crate deal with this one type; `#[from]`
/// lets `?` convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum WardenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// The runtime actor has shut down.
    #[error("warden runtime is not running")]
    Stopped,
}
