//! Runtime actor: drives any [`LifecycleHooks`] for hosts without a loop.
//!
//! Hosts that already have a tick callback call the hooks themselves. For
//! everything else (tools, simulations, servers that only emit events)
//! [`spawn_runtime`] moves the hooks and the host into a task that ticks
//! at the server rate and takes join/leave commands over a channel.
//!
//! The task is the control context. Nothing else touches the hooks or the
//! host while it runs.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use warden_protocol::PlayerId;
use warden_session::PlayerInfo;
use warden_tick::{ServerClock, TickConfig};

use crate::{Host, LifecycleHooks, WardenError};

const COMMAND_BUFFER: usize = 256;

/// Commands sent to the runtime actor.
#[derive(Debug)]
pub(crate) enum Command {
    Join(PlayerInfo),
    Leave(PlayerId),
    Shutdown,
}

/// Handle to a running runtime actor. Cheap to clone.
#[derive(Debug, Clone)]
pub struct WardenHandle {
    sender: mpsc::Sender<Command>,
}

impl WardenHandle {
    /// Reports a player join.
    pub async fn join(&self, player: PlayerInfo) -> Result<(), WardenError> {
        self.send(Command::Join(player)).await
    }

    /// Reports a player leave.
    pub async fn leave(&self, player_id: PlayerId) -> Result<(), WardenError> {
        self.send(Command::Leave(player_id)).await
    }

    /// Asks the actor to stop after the commands already queued.
    pub async fn shutdown(&self) -> Result<(), WardenError> {
        self.send(Command::Shutdown).await
    }

    /// Returns `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn send(&self, command: Command) -> Result<(), WardenError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| WardenError::Stopped)
    }
}

/// Spawns the actor on the current tokio runtime.
///
/// The join handle yields the hooks back once the actor stops, which
/// happens on [`WardenHandle::shutdown`] or when every handle is dropped.
pub fn spawn_runtime<W, H>(hooks: W, host: H, tick: TickConfig) -> (WardenHandle, JoinHandle<W>)
where
    W: LifecycleHooks + Send + 'static,
    H: Host + Send + 'static,
{
    let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);
    let actor = RuntimeActor {
        hooks,
        host,
        clock: ServerClock::new(tick),
        receiver,
    };
    (WardenHandle { sender }, tokio::spawn(actor.run()))
}

struct RuntimeActor<W, H> {
    hooks: W,
    host: H,
    clock: ServerClock,
    receiver: mpsc::Receiver<Command>,
}

impl<W: LifecycleHooks, H: Host> RuntimeActor<W, H> {
    async fn run(mut self) -> W {
        tracing::info!(rate_hz = self.clock.tick_rate_hz(), "warden runtime started");

        loop {
            tokio::select! {
                command = self.receiver.recv() => match command {
                    Some(Command::Join(player)) => self.hooks.on_join(&self.host, player),
                    Some(Command::Leave(player_id)) => self.hooks.on_leave(player_id),
                    Some(Command::Shutdown) | None => break,
                },
                _ = self.clock.wait_for_tick() => {
                    self.hooks.on_tick(&self.host);
                    self.clock.record_pass_end();
                }
            }
        }

        let stats = self.clock.stats();
        tracing::info!(
            ticks = stats.total_ticks,
            overruns = stats.total_overruns,
            skipped = stats.total_skipped,
            slowest_pass_ms = stats.slowest_pass.as_secs_f64() * 1000.0,
            "warden runtime stopped"
        );
        self.hooks
    }
}
