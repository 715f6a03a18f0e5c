//! The physical state flags a host reports alongside each position.

/// What the player is doing at sample time, as far as physics is concerned.
///
/// The host fills this in from its own entity state. Two groups matter:
///
/// - **Exempt modes** (`creative`, `spectator`, `flying`): movement rules
///   don't apply at all.
/// - **Support** (`on_ground`, `in_water`, `in_lava`, `gliding`,
///   `passenger`): anything that legitimately keeps a player off the
///   ground without them flying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovementState {
    pub creative: bool,
    pub spectator: bool,
    /// Ability-granted flight (not elytra gliding).
    pub flying: bool,
    pub on_ground: bool,
    pub in_water: bool,
    pub in_lava: bool,
    /// Elytra-style gliding.
    pub gliding: bool,
    /// Riding a vehicle or another entity.
    pub passenger: bool,
}

impl MovementState {
    /// A survival-mode player standing on the ground.
    pub fn grounded() -> Self {
        Self {
            on_ground: true,
            ..Self::default()
        }
    }

    /// A survival-mode player with nothing holding them up.
    pub fn airborne() -> Self {
        Self::default()
    }

    /// Creative, spectator, or ability flight.
    pub fn is_exempt(&self) -> bool {
        self.creative || self.spectator || self.flying
    }

    /// Whether something other than cheating explains being off the ground.
    pub fn is_supported(&self) -> bool {
        self.on_ground || self.in_water || self.in_lava || self.gliding || self.passenger
    }
}
