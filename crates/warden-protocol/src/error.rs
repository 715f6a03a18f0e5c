//! Error types for the protocol layer.

/// Errors that can occur while converting wire types to or from bytes.
///
/// A `ProtocolError` always means the bytes and the expected shape
/// disagree. It never means the network failed; that lives in the
/// backend crate.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: the body is not JSON at all (an HTML error page
    /// from a proxy), a field has the wrong type, or the top-level value
    /// is not an object.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
