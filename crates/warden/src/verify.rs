//! Join verification: the one-shot identity check and its resumption.
//!
//! ```text
//!  control context                          I/O runtime
//!  ───────────────                          ───────────
//!  on_join ── begin() ── spawn ───────────→ backend.verify()
//!                                                 │
//!  on_tick ── drain() ←── Resume ── mpsc ←────────┘
//!               │
//!               └─ epoch still current? settle + act : discard
//! ```
//!
//! The channel is the only way a result gets back into the control
//! context. The I/O task never touches a session or the host.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use warden_backend::{outcome_of, Backend};
use warden_protocol::{PlayerId, VerificationOutcome, VerifyRequest};
use warden_session::{Session, SessionStore, VerificationState};

use crate::{Host, WardenConfig};

/// A finished verification on its way back to the control context.
#[derive(Debug)]
pub(crate) struct Resume {
    pub(crate) player_id: PlayerId,
    /// Epoch of the session the request was issued for.
    pub(crate) epoch: u64,
    pub(crate) outcome: VerificationOutcome,
}

/// How [`Coordinator::begin`] dealt with a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStart {
    /// Whitelisted; verified without a network call.
    Whitelisted,
    /// Verification is turned off; verified without a network call.
    Disabled,
    /// A request is in flight.
    Requested,
}

pub(crate) struct Coordinator<B> {
    config: Arc<WardenConfig>,
    backend: Arc<B>,
    io: Handle,
    tx: mpsc::UnboundedSender<Resume>,
    rx: mpsc::UnboundedReceiver<Resume>,
    in_flight: usize,
}

impl<B: Backend> Coordinator<B> {
    pub(crate) fn new(config: Arc<WardenConfig>, backend: Arc<B>, io: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            config,
            backend,
            io,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Requests sent whose results have not been drained yet.
    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Starts verification for a freshly registered session.
    pub(crate) fn begin<H: Host>(&mut self, host: &H, session: &mut Session) -> VerifyStart {
        let player_id = session.player_id();

        if self.config.whitelist.contains(session.name()) {
            settle(session, VerificationState::Verified);
            tracing::info!(
                %player_id,
                player = %session.name(),
                "whitelisted, verification skipped"
            );
            host.send_message(
                player_id,
                &format!("[Warden] Whitelisted player, welcome back {}!", session.name()),
            );
            return VerifyStart::Whitelisted;
        }

        if !self.config.enabled {
            settle(session, VerificationState::Verified);
            tracing::debug!(%player_id, "verification disabled, letting player through");
            return VerifyStart::Disabled;
        }

        let request = VerifyRequest {
            username: session.name().to_string(),
            client_ip: session.address().to_string(),
        };
        let epoch = session.epoch();
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();

        tracing::debug!(%player_id, epoch, "verification requested");
        self.in_flight += 1;
        let call = self.io.spawn(async move { backend.verify(request).await });
        self.io.spawn(async move {
            // A panicking backend still owes the control context an answer.
            let outcome = match call.await {
                Ok(result) => outcome_of(result),
                Err(e) => VerificationOutcome::TransportError {
                    cause: format!("verification task failed: {e}"),
                    timed_out: false,
                },
            };
            // The receiver only goes away with the Warden itself.
            let _ = tx.send(Resume {
                player_id,
                epoch,
                outcome,
            });
        });

        VerifyStart::Requested
    }

    /// Applies every result that has arrived so far. Never blocks.
    pub(crate) fn drain<H: Host>(&mut self, sessions: &mut SessionStore, host: &H) -> usize {
        let mut applied = 0;
        while let Ok(resume) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.resume(sessions, host, resume);
            applied += 1;
        }
        applied
    }

    /// Waits for the next result and applies it.
    ///
    /// Returns `false` without waiting if nothing is in flight.
    pub(crate) async fn next<H: Host>(&mut self, sessions: &mut SessionStore, host: &H) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(resume) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.resume(sessions, host, resume);
                true
            }
            None => false,
        }
    }

    fn resume<H: Host>(&self, sessions: &mut SessionStore, host: &H, resume: Resume) {
        let Resume {
            player_id,
            epoch,
            outcome,
        } = resume;

        if !sessions.is_current(player_id, epoch) {
            tracing::debug!(
                %player_id,
                epoch,
                "verification result for a departed session discarded"
            );
            return;
        }

        let Some(session) = sessions.get_mut(player_id) else {
            return;
        };
        let config = &self.config;
        let (state, notice) = match outcome {
            VerificationOutcome::Verified => (VerificationState::Verified, None),
            VerificationOutcome::Rejected { reason } => {
                tracing::warn!(%player_id, %reason, "verification rejected");
                (
                    VerificationState::Rejected,
                    Some(config.not_verified_notice(&reason)),
                )
            }
            VerificationOutcome::BackendError { detail } => {
                tracing::warn!(%player_id, %detail, "backend refused verification request");
                (VerificationState::Error, Some(config.kick_message_error.clone()))
            }
            VerificationOutcome::TransportError { cause, timed_out } => {
                tracing::warn!(%player_id, %cause, timed_out, "verification request failed");
                (VerificationState::Error, Some(config.kick_message_error.clone()))
            }
            VerificationOutcome::MalformedResponse { cause } => {
                tracing::warn!(%player_id, %cause, "malformed verification response");
                (VerificationState::Error, Some(config.kick_message_error.clone()))
            }
        };

        settle(session, state);
        match notice {
            None => {
                tracing::info!(%player_id, player = %session.name(), "verification passed");
                host.send_message(
                    player_id,
                    &format!("[Warden] Verified, welcome back {}!", session.name()),
                );
            }
            // The session stays until the host reports the leave.
            Some(notice) => host.disconnect(player_id, &notice),
        }
    }
}

fn settle(session: &mut Session, state: VerificationState) {
    if let Err(e) = session.settle_verification(state) {
        tracing::warn!(error = %e, "verification result ignored");
    }
}
