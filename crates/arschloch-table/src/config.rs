//! Table configuration.

use arschloch_idle::IdleConfig;
use serde::{Deserialize, Serialize};

/// Settings for a table actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Inactivity warning and reset timings.
    pub idle: IdleConfig,

    /// Seed for the deal RNG. `None` draws one at spawn time; the chosen
    /// seed is logged so a session can be replayed.
    pub seed: Option<u64>,

    /// Capacity of the actor's inbox. Senders wait when it is full.
    pub channel_size: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            idle: IdleConfig::default(),
            seed: None,
            channel_size: 64,
        }
    }
}

impl TableConfig {
    /// Default config with a fixed deal seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Same config with different idle timings.
    pub fn with_idle(mut self, idle: IdleConfig) -> Self {
        self.idle = idle;
        self
    }
}
