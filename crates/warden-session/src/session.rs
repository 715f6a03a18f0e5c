//! Session types: the server's record of one connected player.
//!
//! A session tracks:
//! - WHO the player is (`PlayerId`, name, network address)
//! - WHERE they were last sampled (the movement baseline)
//! - HOW suspicious they have been (airborne time, violation count)
//! - WHETHER the backend has vouched for them yet

use warden_protocol::{PlayerId, Vec3};

use crate::SessionError;

// ---------------------------------------------------------------------------
// PlayerInfo
// ---------------------------------------------------------------------------

/// What the host knows about a player at the moment they join.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerInfo {
    pub id: PlayerId,
    /// Display/login name. Whitelists and backend calls use this.
    pub name: String,
    /// The client's network address as the host sees it.
    pub address: String,
    /// Spawn position; becomes the first movement baseline.
    pub position: Vec3,
}

// ---------------------------------------------------------------------------
// VerificationState
// ---------------------------------------------------------------------------

/// Where a session stands in the one-shot identity check.
///
/// ```text
///            ┌──→ Verified
///   Pending ─┼──→ Rejected
///            └──→ Error
/// ```
///
/// All three outcomes are terminal. Rejected and Error sessions have been
/// told to disconnect and linger only until the host reports the leave;
/// [`is_closing`](Self::is_closing) lets the sampling pass skip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationState {
    Pending,
    Verified,
    Rejected,
    Error,
}

impl VerificationState {
    /// Returns `true` once a result has been recorded.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns `true` for outcomes that end in a disconnect.
    pub fn is_closing(&self) -> bool {
        matches!(self, Self::Rejected | Self::Error)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A single player's tracked state.
///
/// Identity fields are fixed at creation. The violation count only ever
/// goes up; the sole way to clear it is to drop the session.
#[derive(Debug, Clone)]
pub struct Session {
    info: PlayerInfo,

    /// Distinguishes this registration from any earlier one for the same
    /// player. A verification result carries the epoch it was issued
    /// for, so a response to a previous connection can never act on a
    /// reconnected player.
    epoch: u64,

    /// Last position used as the movement baseline.
    pub last_position: Vec3,

    /// Ticks since creation. Drives the sampling cadence.
    pub sample_counter: u64,

    /// Ticks spent continuously airborne without an excuse.
    pub airborne_ticks: u32,

    violations: u32,

    verification: VerificationState,
}

impl Session {
    pub(crate) fn new(info: PlayerInfo, epoch: u64) -> Self {
        Self {
            last_position: info.position,
            info,
            epoch,
            sample_counter: 0,
            airborne_ticks: 0,
            violations: 0,
            verification: VerificationState::Pending,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.info.id
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn address(&self) -> &str {
        &self.info.address
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn violations(&self) -> u32 {
        self.violations
    }

    pub fn verification(&self) -> VerificationState {
        self.verification
    }

    /// Adds `count` violations and returns the new total.
    pub fn record_violations(&mut self, count: u32) -> u32 {
        self.violations = self.violations.saturating_add(count);
        self.violations
    }

    /// Records the result of the identity check.
    ///
    /// # Errors
    /// - [`SessionError::NotTerminal`] if `outcome` is `Pending`
    /// - [`SessionError::AlreadySettled`] if a result was already recorded
    pub fn settle_verification(
        &mut self,
        outcome: VerificationState,
    ) -> Result<(), SessionError> {
        if !outcome.is_terminal() {
            return Err(SessionError::NotTerminal(self.info.id));
        }
        if self.verification.is_terminal() {
            return Err(SessionError::AlreadySettled(self.info.id, self.verification));
        }
        self.verification = outcome;
        Ok(())
    }
}
