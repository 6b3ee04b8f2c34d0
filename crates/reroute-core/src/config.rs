//! Engine policy and tuning parameters.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the console engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Interval between animation ticks in milliseconds
    pub tick_interval_ms: u64,
    /// Progress added to every flight per tick (wraps modulo 1)
    pub progress_delta: f64,
    /// Peak synthetic altitude oscillation in feet
    pub altitude_amplitude_ft: f64,
    /// Minimum risk score for a flight to receive a reroute proposal
    pub risk_threshold: f64,
    /// Fraction of the current risk kept after a reroute is applied
    pub risk_reduction_factor: f64,
    /// Lateral bend applied to rerouted paths
    pub reroute_bend_factor: f64,
    /// Number of aircraft kept on the console
    pub fleet_size: usize,
    /// Seed for path jitter and synthetic defaults
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            progress_delta: 0.02,
            altitude_amplitude_ft: 200.0,
            risk_threshold: 0.6,
            risk_reduction_factor: 0.4,
            reroute_bend_factor: 1.0,
            fleet_size: 10,
            seed: 42,
        }
    }
}

impl EngineConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
