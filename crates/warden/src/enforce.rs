//! Violation accumulation and enforcement.
//!
//! [`apply`] folds one detector assessment into a session. [`Enforcer`]
//! carries out the kick once a session crosses the threshold.

use std::sync::Arc;

use tokio::runtime::Handle;
use warden_backend::Backend;
use warden_movement::{Airborne, Assessment, Movement};
use warden_protocol::{PlayerId, ReportRequest, Vec3, AUTO_KICK_REASON};
use warden_session::{Session, SessionStore};

use crate::Host;

/// What the sampling pass should do with a session after [`apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// Nothing new against this session.
    Clean,
    /// New violations recorded, still under the threshold.
    Flagged { total: u32 },
    /// The threshold was reached on this pass.
    Enforce { total: u32 },
}

/// Applies an assessment to `session` and moves its baseline to `position`.
///
/// The baseline always moves, even on a violation, so a single long hop
/// counts once rather than on every following pass.
pub(crate) fn apply(
    session: &mut Session,
    assessment: &Assessment,
    position: Vec3,
    threshold: u32,
) -> Verdict {
    let player_id = session.player_id();

    match assessment.movement {
        Movement::Teleport { distance } => {
            tracing::debug!(%player_id, distance, "large displacement treated as teleport");
        }
        Movement::SpeedViolation { distance } => {
            tracing::warn!(%player_id, player = %session.name(), distance, "speed violation");
        }
        Movement::Exempt | Movement::Normal { .. } => {}
    }
    if let Airborne::FlightAccumulating { ticks } = assessment.airborne {
        tracing::warn!(
            %player_id,
            player = %session.name(),
            airborne_ticks = ticks,
            "flight violation"
        );
    }

    session.last_position = position;
    session.airborne_ticks = assessment.airborne_ticks();

    let added = assessment.violations();
    if added == 0 {
        return Verdict::Clean;
    }

    let total = session.record_violations(added);
    if total >= threshold {
        Verdict::Enforce { total }
    } else {
        Verdict::Flagged { total }
    }
}

/// Kicks and reports sessions that crossed the violation threshold.
pub(crate) struct Enforcer<B> {
    backend: Arc<B>,
    io: Handle,
    kick_message: String,
}

impl<B: Backend> Enforcer<B> {
    pub(crate) fn new(backend: Arc<B>, io: Handle, kick_message: String) -> Self {
        Self {
            backend,
            io,
            kick_message,
        }
    }

    /// Removes the session, disconnects the player, and reports them.
    ///
    /// The removal happens first and gates everything else, so a second
    /// call for the same player finds nothing and returns `false`.
    pub(crate) fn enforce<H: Host>(
        &self,
        sessions: &mut SessionStore,
        host: &H,
        player_id: PlayerId,
    ) -> bool {
        let Some(session) = sessions.take(player_id) else {
            return false;
        };

        tracing::info!(
            %player_id,
            player = %session.name(),
            violations = session.violations(),
            "anti-cheat kick"
        );
        host.disconnect(player_id, &self.kick_message);

        let report = ReportRequest {
            username: session.name().to_string(),
            client_ip: session.address().to_string(),
            violation_count: session.violations(),
            reason: AUTO_KICK_REASON.to_string(),
        };
        let backend = Arc::clone(&self.backend);
        self.io.spawn(async move {
            match backend.report(report).await {
                Ok(body) => tracing::info!(%player_id, %body, "violation report sent"),
                Err(e) => tracing::warn!(%player_id, error = %e, "violation report failed"),
            }
        });

        true
    }
}
