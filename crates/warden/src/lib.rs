//! # Warden
//!
//! Server-side movement anti-cheat and join verification for game servers.
//!
//! Warden sits inside the server process and watches every connected
//! player: it samples movement once per second and kicks players whose
//! speed or airtime keeps breaking the rules, and it asks an external
//! backend whether each arriving player is allowed in.
//!
//! ## Architecture
//!
//! ```text
//!   host (game engine)
//!        │ on_join / on_leave / on_tick
//!        ▼
//!   ┌─────────────────────────── Warden ───────────────────────────┐
//!   │ SessionStore ── classify() ── enforce ── Backend::report      │
//!   │      ▲                                                        │
//!   │      └── drain ◄── mpsc ◄── Backend::verify (I/O runtime)     │
//!   └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use warden::prelude::*;
//!
//! # struct Server;
//! # impl Host for Server {
//! #     fn snapshot(&self, _: PlayerId) -> Option<PlayerSnapshot> { None }
//! #     fn disconnect(&self, _: PlayerId, _: &str) {}
//! # }
//! # async fn run() -> Result<(), WardenError> {
//! let config = Arc::new(WardenConfig::load("config/warden.json")?);
//! let warden = Warden::connect(config, tokio::runtime::Handle::current())?;
//!
//! let (handle, task) = spawn_runtime(warden, Server, TickConfig::default());
//! handle.join(PlayerInfo {
//!     id: PlayerId(1),
//!     name: "Steve".into(),
//!     address: "203.0.113.9".into(),
//!     position: Vec3::ZERO,
//! }).await?;
//! handle.shutdown().await?;
//! let _warden = task.await.expect("runtime task panicked");
//! # Ok(())
//! # }
//! ```

mod config;
mod enforce;
mod error;
mod hooks;
mod host;
mod runtime;
mod verify;
mod warden;

pub use config::{AntiCheatConfig, ConfigError, WardenConfig, Whitelist};
pub use error::WardenError;
pub use hooks::LifecycleHooks;
pub use host::{Host, PlayerSnapshot};
pub use runtime::{spawn_runtime, WardenHandle};
pub use verify::VerifyStart;
pub use warden::Warden;

pub use warden_backend as backend;
pub use warden_movement as movement;
pub use warden_protocol as protocol;
pub use warden_session as session;
pub use warden_tick as tick;

/// Everything an embedder usually needs.
pub mod prelude {
    pub use crate::{
        spawn_runtime, AntiCheatConfig, ConfigError, Host, LifecycleHooks, PlayerSnapshot,
        VerifyStart, Warden, WardenConfig, WardenError, WardenHandle, Whitelist,
    };
    pub use warden_backend::{Backend, BackendError, HttpBackend};
    pub use warden_movement::{DetectorConfig, MovementState};
    pub use warden_protocol::{PlayerId, Vec3, VerificationOutcome};
    pub use warden_session::{PlayerInfo, VerificationState};
    pub use warden_tick::TickConfig;
}
