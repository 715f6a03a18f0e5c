//! Shared types for Warden.
//!
//! This crate defines the vocabulary every other layer speaks:
//!
//! - **Identity and space** ([`PlayerId`], [`Vec3`]): who a session
//!   belongs to and where they stand.
//! - **Backend wire format** ([`VerifyRequest`], [`VerifyResponse`],
//!   [`ReportRequest`]): the JSON bodies exchanged with the identity
//!   service.
//! - **Outcomes** ([`VerificationOutcome`]): the one value a verification
//!   call produces, whatever went right or wrong.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how wire types become
//!   bytes and back.
//!
//! # Architecture
//!
//! ```text
//! Backend (HTTP bytes) → Protocol (wire types) → Warden core (sessions)
//! ```
//!
//! Nothing here performs I/O or knows about sessions.

mod codec;
mod error;
mod types;
mod wire;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{PlayerId, Vec3};
pub use wire::{
    ReportRequest, VerificationOutcome, VerifyRequest, VerifyResponse,
    AUTO_KICK_REASON, UNKNOWN_REASON,
};
