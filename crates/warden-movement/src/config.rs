//! Detection thresholds.

use serde::{Deserialize, Serialize};

/// Thresholds for [`classify`](crate::classify).
///
/// Distances are in blocks per sampling interval; tick counts are server
/// ticks (20 per second).
///
/// The defaults leave room for legitimate play: a sprint-jumping player
/// covers about 5.6 blocks per second, well under the 12-block limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectorConfig {
    /// Horizontal distance per interval above which a sample is a speed
    /// violation. Default: 12.0.
    pub max_horizontal_speed: f64,

    /// Horizontal distance above which a sample is a teleport (trusted
    /// relocation, not movement). Default: 50.0.
    pub teleport_threshold: f64,

    /// Airborne ticks the accumulator may reach before each further
    /// unsupported sample counts as a flight violation. Default: 80 (4 s).
    pub max_air_ticks: u32,

    /// Ticks between two movement samples of the same session.
    /// Default: 20 (1 s).
    pub check_interval_ticks: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_horizontal_speed: 12.0,
            teleport_threshold: 50.0,
            max_air_ticks: 80,
            check_interval_ticks: 20,
        }
    }
}
