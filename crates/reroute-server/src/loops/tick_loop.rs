//! Animation tick loop.
//!
//! Drives `on_tick` at the configured interval and pushes each resulting
//! snapshot to WebSocket subscribers.

use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::{interval, MissedTickBehavior};

use crate::state::AppState;

pub async fn run_tick_loop(state: Arc<AppState>, mut shutdown: broadcast::Receiver<()>) {
    let mut ticker = interval(state.config().engine.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Tick loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                let (_moved, snapshot) = state.mutate(|engine| engine.on_tick());
                if snapshot.tick % 60 == 0 {
                    tracing::debug!(
                        "Tick {}: avg risk {:.2}, {} open proposal(s)",
                        snapshot.tick,
                        snapshot.summary.average_risk,
                        snapshot.proposals.len()
                    );
                }
            }
        }
    }
}
