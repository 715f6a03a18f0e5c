//! The session store: every tracked player, keyed by identity.
//!
//! # Concurrency note
//!
//! `SessionStore` is NOT thread-safe by itself. It is owned by the single
//! control context that performs all session mutation, and other contexts
//! reach it only by handing work back to that owner. That ownership is
//! what makes insert/remove atomic with respect to a sampling pass.
//!
//! The sampling pass never holds a borrow across the work it does per
//! session: [`SessionStore::for_each_due`] returns a snapshot of due ids,
//! and the caller looks each one up again. A session removed mid-pass
//! (enforced, or dropped because the host lost the player) is simply
//! absent on lookup.

use std::collections::HashMap;

use warden_protocol::PlayerId;

use crate::{PlayerInfo, Session};

/// Tracks all connected players' sessions.
///
/// ## Lifecycle
///
/// ```text
/// register() ──→ for_each_due() ... for_each_due() ──→ remove() / take()
///     │                                                     │
///     ▼                                                     ▼
///  [present]                                            [absent]
/// ```
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<PlayerId, Session>,

    /// Epoch handed to the next registration. Starts at 1 and only grows,
    /// so an epoch is never reused within a store's lifetime.
    next_epoch: u64,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            next_epoch: 1,
        }
    }

    /// Starts tracking a player.
    ///
    /// Returns the new session's epoch, or `None` if a session already
    /// exists for this player (a reconnect racing the old leave). The
    /// existing session is left untouched in that case.
    pub fn register(&mut self, info: PlayerInfo) -> Option<u64> {
        if self.sessions.contains_key(&info.id) {
            tracing::debug!(player_id = %info.id, "session already registered, ignoring");
            return None;
        }

        let epoch = self.next_epoch.max(1);
        self.next_epoch = epoch + 1;

        let player_id = info.id;
        tracing::info!(%player_id, player = %info.name, epoch, "session registered");
        self.sessions.insert(player_id, Session::new(info, epoch));
        Some(epoch)
    }

    /// Stops tracking a player.
    ///
    /// Safe to call any number of times. Returns `true` only for the call
    /// that actually removed the session, which is what callers use to
    /// make teardown side effects happen exactly once.
    pub fn remove(&mut self, player_id: PlayerId) -> bool {
        self.take(player_id).is_some()
    }

    /// Removes and returns a session, if present.
    ///
    /// Like [`remove`](Self::remove), but hands back the final state so
    /// the caller can report on it after it has left the store.
    pub fn take(&mut self, player_id: PlayerId) -> Option<Session> {
        let session = self.sessions.remove(&player_id)?;
        tracing::info!(
            %player_id,
            violations = session.violations(),
            "session removed"
        );
        Some(session)
    }

    /// Advances every session's sample counter by one tick and returns the
    /// ids whose counter just reached a multiple of `interval_ticks`.
    ///
    /// An `interval_ticks` of 0 is treated as 1 (sample every tick).
    pub fn for_each_due(&mut self, interval_ticks: u32) -> Vec<PlayerId> {
        let interval = u64::from(interval_ticks.max(1));
        let mut due = Vec::new();

        for session in self.sessions.values_mut() {
            session.sample_counter += 1;
            if session.sample_counter % interval == 0 {
                due.push(session.player_id());
            }
        }

        due
    }

    /// Returns `true` if `player_id` is tracked under exactly this epoch.
    pub fn is_current(&self, player_id: PlayerId, epoch: u64) -> bool {
        self.sessions
            .get(&player_id)
            .is_some_and(|s| s.epoch() == epoch)
    }

    /// Looks up a session by player ID.
    pub fn get(&self, player_id: PlayerId) -> Option<&Session> {
        self.sessions.get(&player_id)
    }

    /// Looks up a session by player ID for mutation.
    pub fn get_mut(&mut self, player_id: PlayerId) -> Option<&mut Session> {
        self.sessions.get_mut(&player_id)
    }

    /// Returns `true` if the player is tracked.
    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.sessions.contains_key(&player_id)
    }

    /// Number of tracked sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if nobody is tracked.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
