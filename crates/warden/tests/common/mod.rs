//! Shared test doubles: a recording host and a scripted backend.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use warden::prelude::*;
use warden_protocol::{ReportRequest, VerifyRequest, VerifyResponse};

// =========================================================================
// MockHost
// =========================================================================

/// A host whose players are whatever the test placed there. Records every
/// disconnect and chat message.
#[derive(Default)]
pub struct MockHost {
    players: Mutex<HashMap<PlayerId, PlayerSnapshot>>,
    pub disconnects: Mutex<Vec<(PlayerId, String)>>,
    pub messages: Mutex<Vec<(PlayerId, String)>>,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn place(&self, id: PlayerId, position: Vec3, state: MovementState) {
        self.players
            .lock()
            .unwrap()
            .insert(id, PlayerSnapshot { position, state });
    }

    pub fn vanish(&self, id: PlayerId) {
        self.players.lock().unwrap().remove(&id);
    }

    pub fn disconnects(&self) -> Vec<(PlayerId, String)> {
        self.disconnects.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<(PlayerId, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl Host for MockHost {
    fn snapshot(&self, player_id: PlayerId) -> Option<PlayerSnapshot> {
        self.players.lock().unwrap().get(&player_id).copied()
    }

    fn disconnect(&self, player_id: PlayerId, notice: &str) {
        self.disconnects
            .lock()
            .unwrap()
            .push((player_id, notice.to_string()));
    }

    fn send_message(&self, player_id: PlayerId, text: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((player_id, text.to_string()));
    }
}

// =========================================================================
// ScriptedBackend
// =========================================================================

/// One scripted answer to `verify`.
pub enum Reply {
    Respond(VerifyResponse),
    /// Answers once the test sends on the paired oneshot.
    Deferred(oneshot::Receiver<VerifyResponse>),
    TimeOut,
    Malformed,
    /// The backend call panics.
    Crash,
}

/// A backend that answers `verify` from a script and forwards every
/// report to a channel.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Reply>>,
    pub verify_calls: Arc<Mutex<Vec<VerifyRequest>>>,
    reports: mpsc::UnboundedSender<ReportRequest>,
}

impl ScriptedBackend {
    pub fn new(script: impl IntoIterator<Item = Reply>) -> (Self, BackendCalls) {
        let (tx, rx) = mpsc::unbounded_channel();
        let verify_calls = Arc::new(Mutex::new(Vec::new()));
        let backend = Self {
            script: Mutex::new(script.into_iter().collect()),
            verify_calls: Arc::clone(&verify_calls),
            reports: tx,
        };
        (
            backend,
            BackendCalls {
                verify_calls,
                reports: rx,
            },
        )
    }
}

impl Backend for ScriptedBackend {
    async fn verify(&self, request: VerifyRequest) -> Result<VerifyResponse, BackendError> {
        self.verify_calls.lock().unwrap().push(request);
        let reply = self.script.lock().unwrap().pop_front();

        match reply {
            Some(Reply::Respond(response)) => Ok(response),
            Some(Reply::Deferred(rx)) => rx
                .await
                .map_err(|_| BackendError::Config("deferred reply dropped".into())),
            Some(Reply::TimeOut) => Err(BackendError::Timeout(Duration::from_secs(10))),
            Some(Reply::Malformed) => {
                let cause = serde_json::from_str::<u8>("<html>").unwrap_err();
                Err(BackendError::Protocol(warden_protocol::ProtocolError::Decode(cause)))
            }
            Some(Reply::Crash) => panic!("backend crashed"),
            None => panic!("verify called more often than scripted"),
        }
    }

    async fn report(&self, request: ReportRequest) -> Result<String, BackendError> {
        let _ = self.reports.send(request);
        Ok(r#"{"message":"saved","id":1}"#.to_string())
    }
}

/// The test's side of a [`ScriptedBackend`].
pub struct BackendCalls {
    pub verify_calls: Arc<Mutex<Vec<VerifyRequest>>>,
    pub reports: mpsc::UnboundedReceiver<ReportRequest>,
}

impl BackendCalls {
    pub fn verify_count(&self) -> usize {
        self.verify_calls.lock().unwrap().len()
    }

    /// Waits for the next report, failing the test after a second.
    pub async fn next_report(&mut self) -> ReportRequest {
        tokio::time::timeout(Duration::from_secs(1), self.reports.recv())
            .await
            .expect("no report within 1s")
            .expect("report channel closed")
    }

    /// Lets spawned tasks run, then asserts no further report was sent.
    pub async fn assert_no_more_reports(&mut self) {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(self.reports.try_recv().is_err(), "unexpected extra report");
    }
}

// =========================================================================
// Helpers
// =========================================================================

pub fn valid() -> Reply {
    Reply::Respond(VerifyResponse {
        valid: Some(true),
        ..Default::default()
    })
}

pub fn rejected(reason: &str) -> Reply {
    Reply::Respond(VerifyResponse {
        valid: Some(false),
        reason: Some(reason.to_string()),
        detail: None,
    })
}

pub fn player(id: u64, name: &str) -> PlayerInfo {
    PlayerInfo {
        id: PlayerId(id),
        name: name.to_string(),
        address: format!("198.51.100.{id}"),
        position: Vec3::ZERO,
    }
}

/// Config with verification off, so sampling tests need no script.
pub fn sampling_config() -> WardenConfig {
    WardenConfig {
        enabled: false,
        ..WardenConfig::default()
    }
}

pub fn new_warden(config: WardenConfig, backend: ScriptedBackend) -> Warden<ScriptedBackend> {
    Warden::new(Arc::new(config), backend, tokio::runtime::Handle::current())
}

/// Runs exactly one sampling interval's worth of ticks.
pub fn sampling_pass<H: Host>(warden: &mut Warden<ScriptedBackend>, host: &H) {
    let interval = warden.config().anticheat.detector.check_interval_ticks;
    for _ in 0..interval {
        warden.on_tick(host);
    }
}

/// Waits for the next verification result and applies it.
pub async fn settle_next<H: Host>(warden: &mut Warden<ScriptedBackend>, host: &H) -> bool {
    tokio::time::timeout(Duration::from_secs(1), warden.next_verification(host))
        .await
        .expect("verification did not complete within 1s")
}
