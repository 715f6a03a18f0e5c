//! Movement anomaly detection for Warden.
//!
//! One pure function, [`classify`], turns two position samples and the
//! player's physical state into an [`Assessment`]. It keeps no state of
//! its own: the caller carries the airborne accumulator between passes
//! and decides what a violation costs.
//!
//! # Two independent checks
//!
//! ```text
//!            ┌── exempt mode? ──→ Exempt (reset everything)
//! sample ────┤
//!            ├── horizontal distance ──→ Teleport | SpeedViolation | Normal
//!            └── unsupported in the air ──→ Reset | Carrying | FlightAccumulating
//! ```
//!
//! The speed and flight checks run on the same pass and can both flag a
//! violation. A teleport ends the pass early: the relocation is trusted
//! and the airborne accumulator starts over.

mod classify;
mod config;
mod state;

pub use classify::{classify, Airborne, Assessment, Movement};
pub use config::DetectorConfig;
pub use state::MovementState;
