//! Agent configuration.
//!
//! One `AgentConfig` is handed to every component factory. It replaces global
//! constants and shared randomness: each component derives its own RNG from
//! `seed`, so the same seed always reproduces the same battle decisions.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GUESS_FACTOR_BINS, DEFAULT_HISTORY_CAPACITY, DEFAULT_WAVE_TTL};

/// Configuration for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// RNG seed for determinism.
    pub seed: u64,
    /// Ticks retained per opponent.
    pub history_capacity: usize,
    /// Turns after which a wave is expired even if still inside the arena.
    pub wave_ttl: u64,
    /// Escape-factor bins in the guess-factor statistics (forced odd).
    pub guess_factor_bins: usize,
    /// Strategy bundle applied when the agent is created.
    pub default_strategy: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            wave_ttl: DEFAULT_WAVE_TTL,
            guess_factor_bins: DEFAULT_GUESS_FACTOR_BINS,
            default_strategy: "simple".to_string(),
        }
    }
}

impl AgentConfig {
    /// Seed for one component, decorrelated from its siblings by `salt`.
    pub fn component_seed(&self, salt: u64) -> u64 {
        self.seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    /// Bin count rounded up to the next odd number (at least 3).
    pub fn odd_bins(&self) -> usize {
        let bins = self.guess_factor_bins.max(3);
        if bins % 2 == 0 {
            bins + 1
        } else {
            bins
        }
    }
}
