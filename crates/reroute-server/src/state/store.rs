//! Engine handle shared by the HTTP handlers and the tick loop.

use reroute_core::{ConsoleEngine, ConsoleSnapshot};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;

use crate::config::Config;

/// Application state: one engine behind a lock plus the snapshot feed.
pub struct AppState {
    engine: Mutex<ConsoleEngine>,
    config: Config,
    /// Serialized snapshots for WebSocket subscribers
    pub tx: broadcast::Sender<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let engine = ConsoleEngine::new(config.engine.clone(), config.initial_scenario);
        Self::with_engine(engine, config)
    }

    pub fn with_engine(engine: ConsoleEngine, config: Config) -> Self {
        let (tx, _rx) = broadcast::channel(config.broadcast_capacity);
        Self {
            engine: Mutex::new(engine),
            config,
            tx,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lock the engine. A poisoned lock is recovered; every engine
    /// operation leaves it consistent before returning.
    pub fn engine(&self) -> MutexGuard<'_, ConsoleEngine> {
        self.engine
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` against the engine, then publish the resulting snapshot.
    pub fn mutate<T>(&self, f: impl FnOnce(&mut ConsoleEngine) -> T) -> (T, ConsoleSnapshot) {
        let (out, snapshot) = {
            let mut engine = self.engine();
            let out = f(&mut *engine);
            (out, engine.snapshot())
        };
        self.publish(&snapshot);
        (out, snapshot)
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        self.engine().snapshot()
    }

    /// Broadcast a snapshot. Having no subscribers is not an error.
    pub fn publish(&self, snapshot: &ConsoleSnapshot) {
        if self.tx.receiver_count() == 0 {
            return;
        }
        match serde_json::to_string(snapshot) {
            Ok(payload) => {
                let _ = self.tx.send(payload);
            }
            Err(e) => tracing::error!("Failed to serialize snapshot: {}", e),
        }
    }
}
