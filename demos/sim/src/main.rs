//! Simulated server: a handful of bots, one of them cheating.
//!
//! ```text
//! cargo run -p warden-sim                      # in-process backend
//! cargo run -p warden-sim -- config/warden.json # real HTTP backend
//! RUST_LOG=warden=debug cargo run -p warden-sim
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};
use warden::prelude::*;
use warden::protocol::{ReportRequest, VerifyRequest, VerifyResponse};

// ---------------------------------------------------------------------------
// Bots
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
enum Behavior {
    Walker,
    Speeder,
    Hoverer,
    Builder,
}

struct Bot {
    behavior: Behavior,
    position: Vec3,
}

impl Bot {
    /// Moves the bot by roughly one sampling interval's worth.
    fn step(&mut self, rng: &mut impl Rng) -> MovementState {
        let (reach, state) = match self.behavior {
            Behavior::Walker => (8.0, MovementState::grounded()),
            Behavior::Speeder => (35.0, MovementState::grounded()),
            Behavior::Hoverer => (2.0, MovementState::airborne()),
            Behavior::Builder => (
                60.0,
                MovementState {
                    creative: true,
                    flying: true,
                    ..Default::default()
                },
            ),
        };
        let angle = rng.random_range(0.0..std::f64::consts::TAU);
        let dist = rng.random_range(reach * 0.5..reach);
        self.position.x += dist * angle.cos();
        self.position.z += dist * angle.sin();
        state
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

#[derive(Default)]
struct SimServer {
    bots: Mutex<HashMap<PlayerId, Bot>>,
}

impl Host for SimServer {
    fn snapshot(&self, player_id: PlayerId) -> Option<PlayerSnapshot> {
        let mut bots = self.bots.lock().ok()?;
        let bot = bots.get_mut(&player_id)?;
        let state = bot.step(&mut rand::rng());
        Some(PlayerSnapshot {
            position: bot.position,
            state,
        })
    }

    fn disconnect(&self, player_id: PlayerId, notice: &str) {
        if let Ok(mut bots) = self.bots.lock() {
            bots.remove(&player_id);
        }
        tracing::info!(%player_id, %notice, "bot disconnected");
    }

    fn send_message(&self, player_id: PlayerId, text: &str) {
        tracing::info!(%player_id, %text, "chat");
    }
}

// ---------------------------------------------------------------------------
// In-process backend
// ---------------------------------------------------------------------------

/// Lets everyone in except names starting with "guest".
struct LocalBackend;

impl Backend for LocalBackend {
    async fn verify(&self, request: VerifyRequest) -> Result<VerifyResponse, BackendError> {
        tokio::time::sleep(Duration::from_millis(150)).await;
        let guest = request.username.to_lowercase().starts_with("guest");
        Ok(VerifyResponse {
            valid: Some(!guest),
            reason: guest.then(|| "not_launched_from_launcher".to_string()),
            detail: None,
        })
    }

    async fn report(&self, request: ReportRequest) -> Result<String, BackendError> {
        Ok(format!(
            r#"{{"message":"recorded {} violations"}}"#,
            request.violation_count
        ))
    }
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

const ROSTER: [(&str, Behavior); 5] = [
    ("Steve", Behavior::Walker),
    ("Alex", Behavior::Walker),
    ("Zoomer", Behavior::Speeder),
    ("Floaty", Behavior::Hoverer),
    ("guest42", Behavior::Builder),
];

async fn simulate<B: Backend>(warden: Warden<B>) -> Result<(), WardenError> {
    let server = Arc::new(SimServer::default());
    let (handle, task) = spawn_runtime(warden, Arc::clone(&server), TickConfig::default());

    for (i, (name, behavior)) in ROSTER.into_iter().enumerate() {
        let id = PlayerId(i as u64 + 1);
        let position = Vec3::new(0.0, 64.0, 0.0);
        if let Ok(mut bots) = server.bots.lock() {
            bots.insert(id, Bot { behavior, position });
        }
        handle
            .join(PlayerInfo {
                id,
                name: name.to_string(),
                address: format!("192.0.2.{}", i + 10),
                position,
            })
            .await?;
    }

    // Long enough for the hoverer to rack up five flight violations.
    tokio::time::sleep(Duration::from_secs(12)).await;
    handle.shutdown().await?;

    if let Ok(warden) = task.await {
        tracing::info!(tracked = warden.sessions().len(), "simulation finished");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let io = tokio::runtime::Handle::current();
    match std::env::args().nth(1) {
        Some(path) => {
            let config = Arc::new(WardenConfig::load(path)?);
            simulate(Warden::connect(config, io)?).await?;
        }
        None => {
            let config = Arc::new(WardenConfig {
                whitelist: ["Steve"].into_iter().collect(),
                ..WardenConfig::default()
            });
            simulate(Warden::new(config, LocalBackend, io)).await?;
        }
    }
    Ok(())
}
