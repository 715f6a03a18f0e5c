//! The game server, as Warden sees it.

use std::sync::Arc;

use warden_movement::MovementState;
use warden_protocol::{PlayerId, Vec3};

/// A player's position and physical state at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub position: Vec3,
    pub state: MovementState,
}

/// Engine glue implemented by the embedding server.
///
/// Every method is called from the control context only: inside a
/// lifecycle hook or while draining verification results. Implementations
/// may assume they are never called concurrently with each other.
pub trait Host {
    /// Current position and state of an online player.
    ///
    /// `None` means the player is no longer online; Warden drops its
    /// session without further action.
    fn snapshot(&self, player_id: PlayerId) -> Option<PlayerSnapshot>;

    /// Closes the player's connection, showing `notice`.
    fn disconnect(&self, player_id: PlayerId, notice: &str);

    /// Sends a chat line to the player. Hosts without chat can ignore it.
    fn send_message(&self, player_id: PlayerId, text: &str) {
        let _ = (player_id, text);
    }
}

impl<H: Host + ?Sized> Host for Arc<H> {
    fn snapshot(&self, player_id: PlayerId) -> Option<PlayerSnapshot> {
        (**self).snapshot(player_id)
    }

    fn disconnect(&self, player_id: PlayerId, notice: &str) {
        (**self).disconnect(player_id, notice);
    }

    fn send_message(&self, player_id: PlayerId, text: &str) {
        (**self).send_message(player_id, text);
    }
}
