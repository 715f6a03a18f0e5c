//! Backend client abstraction for Warden.
//!
//! Warden doesn't implement the identity service; it only calls it. This
//! crate defines the [`Backend`] trait, the contract every client must
//! honor, and [`HttpBackend`], the production implementation over
//! `reqwest`.
//!
//! # Why a trait?
//!
//! The core only cares about the request/response contract. With a
//! trait, the same coordinator code runs against the real HTTP service
//! in production and against a scripted in-memory backend in tests.
//!
//! # Feature Flags
//!
//! - `http` (default): [`HttpBackend`] via `reqwest` with rustls

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "http")]
mod http;

pub use error::BackendError;
#[cfg(feature = "http")]
pub use http::HttpBackend;

use std::future::Future;

use warden_protocol::{
    Codec, JsonCodec, ReportRequest, VerificationOutcome, VerifyRequest, VerifyResponse,
};

/// A client for the identity/anti-cheat backend.
///
/// # Trait bounds
///
/// - `Send + Sync` → one client is shared by every in-flight request task.
/// - `'static` → it lives as long as the server.
///
/// The returned futures must be `Send` because they are spawned onto the
/// I/O runtime, away from the control context.
///
/// # Example
///
/// ```rust
/// use warden_backend::{Backend, BackendError};
/// use warden_protocol::{ReportRequest, VerifyRequest, VerifyResponse};
///
/// /// Vouches for everyone. Local testing only.
/// struct OpenDoor;
///
/// impl Backend for OpenDoor {
///     async fn verify(&self, _: VerifyRequest) -> Result<VerifyResponse, BackendError> {
///         Ok(VerifyResponse { valid: Some(true), ..Default::default() })
///     }
///
///     async fn report(&self, _: ReportRequest) -> Result<String, BackendError> {
///         Ok(String::new())
///     }
/// }
/// ```
pub trait Backend: Send + Sync + 'static {
    /// `POST /auth/verify-player`.
    ///
    /// # Returns
    /// - `Ok(VerifyResponse)`: a 2xx response with a decodable body
    /// - `Err(BackendError)`: anything else; see [`outcome_of`]
    fn verify(
        &self,
        request: VerifyRequest,
    ) -> impl Future<Output = Result<VerifyResponse, BackendError>> + Send;

    /// `POST /anticheat/report`. Returns the raw response body, which
    /// callers only log.
    fn report(
        &self,
        request: ReportRequest,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;
}

/// Folds the result of [`Backend::verify`] into a [`VerificationOutcome`].
///
/// | Result | Outcome |
/// |--------|---------|
/// | `Ok(response)` | [`VerifyResponse::outcome`] |
/// | `Status` whose body is a verify/error shape | that body's outcome |
/// | `Status` otherwise, `Http`, `Timeout`, `Config` | `TransportError` |
/// | `Protocol` | `MalformedResponse` |
pub fn outcome_of(result: Result<VerifyResponse, BackendError>) -> VerificationOutcome {
    let err = match result {
        Ok(response) => return response.outcome(),
        Err(err) => err,
    };

    match err {
        BackendError::Protocol(cause) => VerificationOutcome::MalformedResponse {
            cause: cause.to_string(),
        },
        BackendError::Status { status, body } => {
            // A 403 with {"detail": "..."} is still a meaningful answer.
            match JsonCodec.decode::<VerifyResponse>(body.as_bytes()) {
                Ok(response) if response.valid.is_some() || response.detail.is_some() => {
                    response.outcome()
                }
                _ => VerificationOutcome::TransportError {
                    cause: format!("HTTP {status}"),
                    timed_out: false,
                },
            }
        }
        other => VerificationOutcome::TransportError {
            timed_out: other.is_timeout(),
            cause: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn status(status: u16, body: &str) -> Result<VerifyResponse, BackendError> {
        Err(BackendError::Status {
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn test_outcome_of_ok_delegates_to_response() {
        let outcome = outcome_of(Ok(VerifyResponse {
            valid: Some(false),
            reason: Some("banned".into()),
            detail: None,
        }));

        assert_eq!(
            outcome,
            VerificationOutcome::Rejected {
                reason: "banned".into()
            }
        );
    }

    #[test]
    fn test_outcome_of_403_with_detail_is_backend_error() {
        let outcome = outcome_of(status(403, r#"{"detail":"invalid api key"}"#));

        assert_eq!(
            outcome,
            VerificationOutcome::BackendError {
                detail: "invalid api key".into()
            }
        );
    }

    #[test]
    fn test_outcome_of_500_with_html_is_transport_error() {
        let outcome = outcome_of(status(500, "<h1>Internal Server Error</h1>"));

        assert_eq!(
            outcome,
            VerificationOutcome::TransportError {
                cause: "HTTP 500".into(),
                timed_out: false
            }
        );
    }

    #[test]
    fn test_outcome_of_502_with_empty_object_is_transport_error() {
        let outcome = outcome_of(status(502, "{}"));

        assert!(matches!(outcome, VerificationOutcome::TransportError { .. }));
    }

    #[test]
    fn test_outcome_of_timeout_is_flagged() {
        let outcome = outcome_of(Err(BackendError::Timeout(Duration::from_secs(10))));

        assert!(matches!(
            outcome,
            VerificationOutcome::TransportError {
                timed_out: true,
                ..
            }
        ));
    }

    #[test]
    fn test_outcome_of_decode_failure_is_malformed() {
        let decode = JsonCodec.decode::<VerifyResponse>(b"not json").unwrap_err();

        let outcome = outcome_of(Err(BackendError::Protocol(decode)));

        assert!(matches!(outcome, VerificationOutcome::MalformedResponse { .. }));
    }

    #[test]
    fn test_outcome_of_config_error_is_transport_error() {
        let outcome = outcome_of(Err(BackendError::Config("no scheme".into())));

        assert!(matches!(
            outcome,
            VerificationOutcome::TransportError {
                timed_out: false,
                ..
            }
        ));
    }
}
