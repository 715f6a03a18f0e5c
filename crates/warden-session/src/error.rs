//! Error types for the session layer.

use warden_protocol::PlayerId;

use crate::VerificationState;

/// Errors that can occur while mutating a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Verification already reached a terminal state for this session.
    /// Each session is verified at most once; a second result means a
    /// duplicate or stale delivery.
    #[error("verification for player {0} already settled as {1:?}")]
    AlreadySettled(PlayerId, VerificationState),

    /// Pending is the starting state, never a result.
    #[error("cannot settle verification for player {0} back to Pending")]
    NotTerminal(PlayerId),
}
