//! Codec trait and the JSON implementation used for backend bodies.
//!
//! The backend speaks JSON today. Keeping the conversion behind a trait
//! means the HTTP client and the tests share exactly one place where
//! bytes become wire types, and a mock backend can reuse it to produce
//! realistic bodies.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the codec lives inside the backend
/// client, which is shared with every spawned verification task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use warden_protocol::{Codec, JsonCodec, VerifyRequest, VerifyResponse};
///
/// let codec = JsonCodec;
///
/// let body = codec
///     .encode(&VerifyRequest {
///         username: "Steve".into(),
///         client_ip: "10.0.0.7".into(),
///     })
///     .unwrap();
/// assert_eq!(body, br#"{"username":"Steve","client_ip":"10.0.0.7"}"#);
///
/// let resp: VerifyResponse = codec.decode(br#"{"valid":true}"#).unwrap();
/// assert_eq!(resp.valid, Some(true));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
