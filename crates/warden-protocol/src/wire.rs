//! Request and response bodies for the identity/anti-cheat backend.
//!
//! Two endpoints matter:
//!
//! ```text
//! POST {base}/auth/verify-player  VerifyRequest  → VerifyResponse
//! POST {base}/anticheat/report    ReportRequest  → (logged, ignored)
//! ```
//!
//! Field names are the backend's (snake_case), which happens to match
//! Rust's own convention, so no `rename` attributes are needed.

use serde::{Deserialize, Serialize};

/// The `reason` sent with every automatic enforcement report.
pub const AUTO_KICK_REASON: &str = "anticheat_auto_kick";

/// Substituted when a rejection arrives without a `reason` field.
pub const UNKNOWN_REASON: &str = "unknown";

/// Body of `POST /auth/verify-player`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub username: String,
    pub client_ip: String,
}

/// Body of `POST /anticheat/report`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub username: String,
    pub client_ip: String,
    pub violation_count: u32,
    pub reason: String,
}

/// Response of `POST /auth/verify-player`, as loosely as the backend sends it.
///
/// Two shapes arrive in practice:
///
/// ```text
/// {"valid": true}                              ← verified
/// {"valid": false, "reason": "token_expired"}  ← rejected
/// {"detail": "invalid api key"}                ← backend error (e.g. 403)
/// ```
///
/// Every field is optional so that both shapes decode; [`outcome`]
/// decides what the combination means.
///
/// [`outcome`]: VerifyResponse::outcome
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerifyResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl VerifyResponse {
    /// Interprets the response body.
    ///
    /// - `detail` present and `valid` absent → [`VerificationOutcome::BackendError`]
    /// - `valid: true` → [`VerificationOutcome::Verified`]
    /// - anything else → [`VerificationOutcome::Rejected`], with the
    ///   backend's reason or `"unknown"`
    pub fn outcome(self) -> VerificationOutcome {
        if self.valid.is_none() {
            if let Some(detail) = self.detail {
                return VerificationOutcome::BackendError { detail };
            }
        }

        if self.valid == Some(true) {
            VerificationOutcome::Verified
        } else {
            VerificationOutcome::Rejected {
                reason: self.reason.unwrap_or_else(|| UNKNOWN_REASON.to_string()),
            }
        }
    }
}

/// The result of one verification call, consumed exactly once on the
/// control context (or dropped if the session is gone by then).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The backend vouched for this identity.
    Verified,

    /// The backend explicitly refused (`valid: false`).
    Rejected { reason: String },

    /// The backend answered with an error shape (`detail` without `valid`).
    BackendError { detail: String },

    /// The request never produced a usable answer: connection refused,
    /// timeout, non-2xx without an error body.
    TransportError { cause: String, timed_out: bool },

    /// A body arrived but was not a verify response.
    MalformedResponse { cause: String },
}

impl VerificationOutcome {
    /// Returns `true` only for [`VerificationOutcome::Verified`].
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}
