//! Lifecycle hooks: the observer interface the host calls into.
//!
//! The host's event system (whatever it is) translates its own join,
//! leave, and tick events into these three calls. Warden knows nothing
//! about how the host dispatches them.

use warden_protocol::PlayerId;
use warden_session::PlayerInfo;

use crate::Host;

/// Observer of player lifecycle events.
///
/// All three methods must be called from the control context, the same
/// one that owns the host's player state.
pub trait LifecycleHooks {
    /// A player finished logging in.
    fn on_join<H: Host>(&mut self, host: &H, player: PlayerInfo);

    /// A player left, for any reason. Idempotent.
    fn on_leave(&mut self, player_id: PlayerId);

    /// One server tick elapsed.
    fn on_tick<H: Host>(&mut self, host: &H);
}
