//! Identity and spatial types shared by every Warden crate.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A stable, unique identifier for a connected player.
///
/// The host maps its own notion of identity (UUID, entity id, ...) onto
/// this newtype once at join time. Sessions, verification results and
/// enforcement all key off it, so a `PlayerId` must never be reused for a
/// different person while a session for it is alive.
///
/// `#[serde(transparent)]` keeps it a bare number in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A point in world space, in block units.
///
/// `y` is the vertical axis. Movement checks only look at the horizontal
/// plane (`x`, `z`); vertical motion is judged by the airborne
/// accumulator instead.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// The world origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Creates a new position.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance between `self` and `other` on the (x, z) plane.
    pub fn horizontal_distance(&self, other: &Vec3) -> f64 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        dx.hypot(dz)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}
