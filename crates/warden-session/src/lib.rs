//! Player session tracking for Warden.
//!
//! This crate owns the record of every connected player:
//!
//! 1. **Registration**: a session appears when a player joins ([`SessionStore::register`])
//! 2. **Sampling cadence**: every tick advances each session's counter and
//!    reports who is due for a movement check ([`SessionStore::for_each_due`])
//! 3. **Teardown**: leave or enforcement removes it, exactly once
//!    ([`SessionStore::remove`], [`SessionStore::take`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Warden core (above)  ← samples, enforces, resumes verification results
//!     ↕
//! Session layer (this crate)  ← who is connected, and their counters
//!     ↕
//! Protocol layer (below)  ← PlayerId, Vec3
//! ```
//!
//! No network or enforcement logic lives here.

mod error;
mod session;
mod store;

pub use error::SessionError;
pub use session::{PlayerInfo, Session, VerificationState};
pub use store::SessionStore;
