//! The `Warden` core: session lifecycle, sampling pass, and verification.

use std::sync::Arc;

use tokio::runtime::Handle;
use warden_backend::{Backend, HttpBackend};
use warden_movement::classify;
use warden_protocol::PlayerId;
use warden_session::{PlayerInfo, SessionStore};

use crate::enforce::{self, Enforcer, Verdict};
use crate::verify::{Coordinator, VerifyStart};
use crate::{Host, LifecycleHooks, WardenConfig, WardenError};

/// Anti-cheat and join verification for one game server.
///
/// Owned by the server's control context. Every method takes `&mut self`
/// and is expected to be called from that one context; backend calls run
/// on the I/O runtime given at construction and come back through
/// [`on_tick`](LifecycleHooks::on_tick).
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use warden::prelude::*;
///
/// # fn main() -> Result<(), WardenError> {
/// let runtime = tokio::runtime::Runtime::new().expect("runtime");
/// let config = Arc::new(WardenConfig::load("config/warden.json")?);
/// let warden = Warden::connect(config, runtime.handle().clone())?;
/// // host glue calls warden.on_join / on_leave / on_tick from here on
/// # drop(warden);
/// # Ok(())
/// # }
/// ```
pub struct Warden<B> {
    config: Arc<WardenConfig>,
    sessions: SessionStore,
    coordinator: Coordinator<B>,
    enforcer: Enforcer<B>,
}

impl Warden<HttpBackend> {
    /// Builds a Warden that talks to the HTTP backend named in `config`.
    pub fn connect(config: Arc<WardenConfig>, io: Handle) -> Result<Self, WardenError> {
        let backend = HttpBackend::new(
            &config.api_base_url,
            &config.api_key,
            config.verify_timeout(),
        )?;
        Ok(Self::new(config, backend, io))
    }
}

impl<B: Backend> Warden<B> {
    /// Builds a Warden over any [`Backend`]. Backend calls are spawned on `io`.
    pub fn new(config: Arc<WardenConfig>, backend: B, io: Handle) -> Self {
        let backend = Arc::new(backend);
        let enforcer = Enforcer::new(
            Arc::clone(&backend),
            io.clone(),
            config.anticheat.kick_message.clone(),
        );
        let coordinator = Coordinator::new(Arc::clone(&config), backend, io);

        tracing::info!(
            verification = config.enabled,
            anticheat = config.anticheat.enabled,
            whitelist = config.whitelist.len(),
            "warden initialized"
        );

        Self {
            config,
            sessions: SessionStore::new(),
            coordinator,
            enforcer,
        }
    }

    pub fn config(&self) -> &WardenConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Verification requests whose results have not been applied yet.
    pub fn pending_verifications(&self) -> usize {
        self.coordinator.in_flight()
    }

    /// Registers a player and starts their verification.
    ///
    /// Returns `None` if the player already had a session.
    pub fn join<H: Host>(&mut self, host: &H, player: PlayerInfo) -> Option<VerifyStart> {
        let player_id = player.id;
        self.sessions.register(player)?;
        let session = self.sessions.get_mut(player_id)?;
        Some(self.coordinator.begin(host, session))
    }

    /// Drops a player's session. Returns whether one existed.
    pub fn leave(&mut self, player_id: PlayerId) -> bool {
        self.sessions.remove(player_id)
    }

    /// Applies every verification result that has arrived, without waiting.
    pub fn drain_verifications<H: Host>(&mut self, host: &H) -> usize {
        self.coordinator.drain(&mut self.sessions, host)
    }

    /// Waits for the next verification result and applies it.
    ///
    /// For hosts whose control context is itself async. Returns `false`
    /// immediately when nothing is in flight.
    pub async fn next_verification<H: Host>(&mut self, host: &H) -> bool {
        self.coordinator.next(&mut self.sessions, host).await
    }

    /// Advances every session one tick and samples the ones that are due.
    pub fn sample<H: Host>(&mut self, host: &H) {
        let anticheat = &self.config.anticheat;
        if !anticheat.enabled {
            return;
        }

        for player_id in self.sessions.for_each_due(anticheat.detector.check_interval_ticks) {
            self.sample_one(host, player_id);
        }
    }

    fn sample_one<H: Host>(&mut self, host: &H, player_id: PlayerId) {
        let anticheat = &self.config.anticheat;

        // Removed earlier in this pass.
        if !self.sessions.contains(player_id) {
            return;
        }

        // Reaped before any exemption so closing and exempt sessions go too.
        let Some(snapshot) = host.snapshot(player_id) else {
            tracing::debug!(%player_id, "player missing from host, dropping session");
            self.sessions.remove(player_id);
            return;
        };

        let Some(session) = self.sessions.get_mut(player_id) else {
            return;
        };
        if session.verification().is_closing()
            || anticheat.exempt_players.contains(session.name())
        {
            return;
        }

        let assessment = classify(
            session.last_position,
            snapshot.position,
            session.airborne_ticks,
            snapshot.state,
            &anticheat.detector,
        );
        tracing::trace!(%player_id, ?assessment, "sampled");

        match enforce::apply(
            session,
            &assessment,
            snapshot.position,
            anticheat.violation_threshold,
        ) {
            Verdict::Clean => {}
            Verdict::Flagged { total } => {
                tracing::debug!(%player_id, violations = total, "violation recorded");
            }
            Verdict::Enforce { .. } => {
                self.enforcer.enforce(&mut self.sessions, host, player_id);
            }
        }
    }
}

impl<B: Backend> LifecycleHooks for Warden<B> {
    fn on_join<H: Host>(&mut self, host: &H, player: PlayerInfo) {
        self.join(host, player);
    }

    fn on_leave(&mut self, player_id: PlayerId) {
        self.leave(player_id);
    }

    /// Drains verification results first, then runs the sampling pass.
    fn on_tick<H: Host>(&mut self, host: &H) {
        self.drain_verifications(host);
        self.sample(host);
    }
}
