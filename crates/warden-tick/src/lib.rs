//! Fixed-rate server clock for Warden.
//!
//! Game servers advance the world in discrete ticks (20 per second for the
//! hosts Warden targets). When Warden is embedded in a host, the host's
//! own tick callback drives the sampling pass. When it runs on its own
//! (the runtime actor, the simulator), [`ServerClock`] stands in for that
//! callback.
//!
//! # Overruns
//!
//! If a pass runs long and the clock wakes up more than a tenth of a tick
//! late, the missed ticks are skipped and the next tick is scheduled from
//! now.
//!
//! # Integration
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* join / leave / shutdown */ }
//!         _ = clock.wait_for_tick() => {
//!             warden.on_tick(&host);
//!             clock.record_pass_end();
//!         }
//!     }
//! }
//! ```

use std::time::{Duration, Instant};

use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Clock configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TickConfig {
    /// Ticks per second. Clamped to `1..=MAX_TICK_RATE_HZ`.
    pub tick_rate_hz: u32,
    /// Fraction of the tick budget (0.0–1.0) a pass may use before a
    /// warning is logged.
    pub budget_warn_threshold: f64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: Self::SERVER_TICK_RATE_HZ,
            budget_warn_threshold: 0.80,
        }
    }
}

impl TickConfig {
    /// The rate vanilla servers tick at.
    pub const SERVER_TICK_RATE_HZ: u32 = 20;

    /// Maximum supported tick rate.
    pub const MAX_TICK_RATE_HZ: u32 = 128;

    /// A config for a specific rate, other settings defaulted.
    pub fn with_rate(tick_rate_hz: u32) -> Self {
        Self {
            tick_rate_hz,
            ..Default::default()
        }
    }

    /// Clamps out-of-range values. Called by [`ServerClock::new`].
    pub fn validated(mut self) -> Self {
        let clamped = self.tick_rate_hz.clamp(1, Self::MAX_TICK_RATE_HZ);
        if clamped != self.tick_rate_hz {
            warn!(
                rate = self.tick_rate_hz,
                clamped, "tick_rate_hz out of range, clamping"
            );
            self.tick_rate_hz = clamped;
        }
        self.budget_warn_threshold = self.budget_warn_threshold.clamp(0.0, 1.0);
        self
    }

    /// Duration of one tick.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate_hz.max(1)))
    }
}

// ---------------------------------------------------------------------------
// Tick info
// ---------------------------------------------------------------------------

/// Returned by [`ServerClock::wait_for_tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInfo {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// `true` if the clock woke up late.
    pub overrun: bool,
    /// Ticks that were skipped because of the overrun.
    pub ticks_skipped: u64,
}

/// Running totals, mostly for logs and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickStats {
    pub total_ticks: u64,
    pub total_overruns: u64,
    pub total_skipped: u64,
    /// Longest pass reported through [`ServerClock::record_pass_end`].
    pub slowest_pass: Duration,
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Fixed-rate tick source.
pub struct ServerClock {
    config: TickConfig,
    tick_duration: Duration,
    tick_count: u64,
    next_tick: TokioInstant,
    /// Wall-clock start of the current pass; consumed by `record_pass_end`.
    pass_start: Option<Instant>,
    stats: TickStats,
}

impl ServerClock {
    /// Creates a clock whose first tick is one tick from now.
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();
        let tick_duration = config.tick_duration();

        debug!(
            rate_hz = config.tick_rate_hz,
            budget_ms = tick_duration.as_secs_f64() * 1000.0,
            "server clock created"
        );

        Self {
            config,
            tick_duration,
            tick_count: 0,
            next_tick: TokioInstant::now() + tick_duration,
            pass_start: None,
            stats: TickStats::default(),
        }
    }

    /// Waits for the next tick. Cancel-safe: dropping the future before it
    /// resolves leaves the schedule untouched.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let deadline = self.next_tick;
        time::sleep_until(deadline).await;

        let now = TokioInstant::now();
        self.tick_count += 1;
        self.pass_start = Some(Instant::now());

        let late_by = now.saturating_duration_since(deadline);
        let overrun = late_by > self.tick_duration / 10;
        let ticks_skipped = if overrun {
            (late_by.as_nanos() / self.tick_duration.as_nanos()) as u64
        } else {
            0
        };

        if ticks_skipped > 0 {
            warn!(
                tick = self.tick_count,
                skipped = ticks_skipped,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "server clock fell behind, skipping ahead"
            );
        }

        self.next_tick = if overrun {
            now + self.tick_duration
        } else {
            deadline + self.tick_duration
        };

        self.stats.total_ticks += 1;
        self.stats.total_skipped += ticks_skipped;
        if overrun {
            self.stats.total_overruns += 1;
        }

        trace!(tick = self.tick_count, overrun, "tick");

        TickInfo {
            tick: self.tick_count,
            overrun,
            ticks_skipped,
        }
    }

    /// Marks the end of the work done for the current tick.
    ///
    /// Logs a warning when the pass used more than the configured share
    /// of the tick budget. A no-op if no tick is in progress.
    pub fn record_pass_end(&mut self) {
        let Some(start) = self.pass_start.take() else {
            return;
        };
        let elapsed = start.elapsed();
        self.stats.slowest_pass = self.stats.slowest_pass.max(elapsed);

        let utilization = elapsed.as_secs_f64() / self.tick_duration.as_secs_f64();
        if utilization >= self.config.budget_warn_threshold {
            warn!(
                tick = self.tick_count,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                budget_ms = self.tick_duration.as_secs_f64() * 1000.0,
                "sampling pass is eating the tick budget"
            );
        }
    }

    /// Ticks fired so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    pub fn tick_rate_hz(&self) -> u32 {
        self.config.tick_rate_hz
    }

    pub fn stats(&self) -> &TickStats {
        &self.stats
    }
}
