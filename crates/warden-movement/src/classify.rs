//! The classifier itself.

use warden_protocol::Vec3;

use crate::{DetectorConfig, MovementState};

/// Verdict of the horizontal (speed) check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Movement {
    /// Creative, spectator, or ability flight. Nothing was measured.
    Exempt,
    /// Moved farther than the teleport threshold: a trusted relocation.
    Teleport { distance: f64 },
    /// Moved faster than the speed limit allows.
    SpeedViolation { distance: f64 },
    /// Within limits.
    Normal { distance: f64 },
}

/// Verdict of the vertical (flight) check, with the new accumulator value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Airborne {
    /// Supported or exempt at sample time; the accumulator is back to zero.
    Reset,
    /// Still in the air but not yet over the limit.
    Carrying { ticks: u32 },
    /// In the air longer than the limit. Counts as a violation.
    FlightAccumulating { ticks: u32 },
}

/// Everything one sampling pass learned about a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub movement: Movement,
    pub airborne: Airborne,
}

impl Assessment {
    /// How many violations this pass contributes (0, 1, or 2).
    pub fn violations(&self) -> u32 {
        let speed = matches!(self.movement, Movement::SpeedViolation { .. });
        let flight = matches!(self.airborne, Airborne::FlightAccumulating { .. });
        u32::from(speed) + u32::from(flight)
    }

    /// The airborne accumulator to carry into the next pass.
    pub fn airborne_ticks(&self) -> u32 {
        match self.airborne {
            Airborne::Reset => 0,
            Airborne::Carrying { ticks } | Airborne::FlightAccumulating { ticks } => ticks,
        }
    }
}

/// Classifies one sampling interval.
///
/// - `last`: the session's movement baseline
/// - `current`: where the player is now
/// - `airborne_ticks`: the accumulator carried from the previous pass
/// - `state`: the player's physical state right now
///
/// The speed check compares horizontal distance with the limits; the
/// flight check adds one interval to the accumulator while the player is
/// unsupported. Either may flag a violation independently.
pub fn classify(
    last: Vec3,
    current: Vec3,
    airborne_ticks: u32,
    state: MovementState,
    config: &DetectorConfig,
) -> Assessment {
    if state.is_exempt() {
        return Assessment {
            movement: Movement::Exempt,
            airborne: Airborne::Reset,
        };
    }

    let distance = last.horizontal_distance(&current);

    if distance > config.teleport_threshold {
        return Assessment {
            movement: Movement::Teleport { distance },
            airborne: Airborne::Reset,
        };
    }

    let movement = if distance > config.max_horizontal_speed {
        Movement::SpeedViolation { distance }
    } else {
        Movement::Normal { distance }
    };

    let airborne = if state.is_supported() {
        Airborne::Reset
    } else {
        let ticks = airborne_ticks.saturating_add(config.check_interval_ticks);
        if ticks > config.max_air_ticks {
            Airborne::FlightAccumulating { ticks }
        } else {
            Airborne::Carrying { ticks }
        }
    };

    Assessment { movement, airborne }
}
