//! Server configuration from environment.

use reroute_core::{EngineConfig, ScenarioId};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub initial_scenario: ScenarioId,
    pub engine: EngineConfig,
    /// Snapshot broadcast buffer for WebSocket subscribers
    pub broadcast_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            initial_scenario: ScenarioId::default(),
            engine: EngineConfig::default(),
            broadcast_capacity: 64,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut engine = defaults.engine.clone();

        engine.tick_interval_ms = parse_env("REROUTE_TICK_MS").unwrap_or(engine.tick_interval_ms);
        engine.seed = parse_env("REROUTE_SEED").unwrap_or(engine.seed);
        engine.fleet_size = parse_env("REROUTE_FLEET_SIZE").unwrap_or(engine.fleet_size);
        engine.risk_threshold =
            parse_env("REROUTE_RISK_THRESHOLD").unwrap_or(engine.risk_threshold);
        engine.risk_reduction_factor =
            parse_env("REROUTE_RISK_REDUCTION").unwrap_or(engine.risk_reduction_factor);

        Self {
            server_port: parse_env("REROUTE_PORT").unwrap_or(defaults.server_port),
            initial_scenario: parse_env("REROUTE_SCENARIO").unwrap_or(defaults.initial_scenario),
            engine,
            broadcast_capacity: parse_env("REROUTE_BROADCAST_CAPACITY")
                .unwrap_or(defaults.broadcast_capacity)
                .max(1),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}
