//! Inactivity supervisor for the Arschloch table.
//!
//! A table that nobody touches for [`IdleConfig::idle_after`] gets a
//! warning; if a further [`IdleConfig::grace`] passes without activity the
//! table is reset. Both stages are reported as [`IdleVerdict`]s so the
//! owner can treat them as ordinary events.
//!
//! # Integration
//!
//! The supervisor sits inside the table actor's `tokio::select!` loop,
//! next to the command inbox:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(event) = inbox.recv() => {
//!             session.apply(event);
//!             idle.record_activity();
//!         }
//!         verdict = idle.wait_for_verdict() => {
//!             session.on_idle(verdict);
//!         }
//!     }
//! }
//! ```
//!
//! While disarmed or disabled, [`IdleSupervisor::wait_for_verdict`] pends
//! forever and the loop only ever takes the inbox branch.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Timing for the two idle stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleConfig {
    /// Inactivity before the warning. Default: 15 minutes.
    pub idle_after: Duration,
    /// Further inactivity after the warning before the reset. Default: 60 s.
    pub grace: Duration,
    /// `false` turns supervision off entirely.
    pub enabled: bool,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            idle_after: Duration::from_secs(15 * 60),
            grace: Duration::from_secs(60),
            enabled: true,
        }
    }
}

impl IdleConfig {
    /// Supervision switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Config with custom stage lengths, enabled.
    pub fn with_timings(idle_after: Duration, grace: Duration) -> Self {
        Self {
            idle_after,
            grace,
            enabled: true,
        }
    }

    /// Fixes values that would make the supervisor fire in a tight loop.
    ///
    /// A zero `idle_after` disables supervision.
    pub fn validated(mut self) -> Self {
        if self.enabled && self.idle_after.is_zero() {
            warn!("idle_after is zero, disabling idle supervision");
            self.enabled = false;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Supervisor
// ---------------------------------------------------------------------------

/// What the supervisor decided when a deadline passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleVerdict {
    /// First stage: nobody acted for `idle_after`.
    Warn,
    /// Second stage: nobody acted during the grace period either.
    Expire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Watching,
    Warned,
}

/// Two-stage inactivity timer owned by a single actor.
///
/// Starts disarmed. [`arm`](Self::arm) begins watching,
/// [`record_activity`](Self::record_activity) pushes the deadline back and
/// cancels a pending warning, [`disarm`](Self::disarm) stops watching.
/// After an [`IdleVerdict::Expire`] the supervisor disarms itself.
#[derive(Debug)]
pub struct IdleSupervisor {
    config: IdleConfig,
    deadline: Option<Instant>,
    stage: Stage,
}

impl IdleSupervisor {
    pub fn new(config: IdleConfig) -> Self {
        let config = config.validated();
        if config.enabled {
            debug!(
                idle_after_s = config.idle_after.as_secs(),
                grace_s = config.grace.as_secs(),
                "idle supervisor created"
            );
        } else {
            debug!("idle supervisor created disabled");
        }
        Self {
            config,
            deadline: None,
            stage: Stage::Watching,
        }
    }

    /// Starts watching if not already armed. No-op when disabled.
    pub fn arm(&mut self) {
        if self.config.enabled && self.deadline.is_none() {
            self.stage = Stage::Watching;
            self.deadline = Some(Instant::now() + self.config.idle_after);
            debug!("idle supervisor armed");
        }
    }

    /// Stops watching. Idempotent.
    pub fn disarm(&mut self) {
        if self.deadline.take().is_some() {
            debug!("idle supervisor disarmed");
        }
        self.stage = Stage::Watching;
    }

    /// Restarts the first stage from now. Ignored while disarmed.
    pub fn record_activity(&mut self) {
        if self.deadline.is_some() {
            self.stage = Stage::Watching;
            self.deadline = Some(Instant::now() + self.config.idle_after);
        }
    }

    /// Waits until the current deadline passes and returns the verdict.
    ///
    /// Pends forever while disarmed or disabled. Cancel-safe: state only
    /// changes after the sleep completes, so dropping the future inside
    /// `select!` loses nothing.
    pub async fn wait_for_verdict(&mut self) -> IdleVerdict {
        let Some(deadline) = self.deadline.filter(|_| self.config.enabled) else {
            return std::future::pending().await;
        };

        time::sleep_until(deadline).await;

        match self.stage {
            Stage::Watching => {
                self.stage = Stage::Warned;
                self.deadline = Some(Instant::now() + self.config.grace);
                warn!(grace_s = self.config.grace.as_secs(), "table idle, warning issued");
                IdleVerdict::Warn
            }
            Stage::Warned => {
                self.stage = Stage::Watching;
                self.deadline = None;
                warn!("table idle past grace period");
                IdleVerdict::Expire
            }
        }
    }

    /// Whether a deadline is currently running.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the warning has fired and the grace period is running.
    pub fn is_warned(&self) -> bool {
        self.deadline.is_some() && self.stage == Stage::Warned
    }

    pub fn config(&self) -> &IdleConfig {
        &self.config
    }
}
