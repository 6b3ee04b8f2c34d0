//! API routes for the console server.

pub mod console;
pub mod error;
pub mod ws;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/v1/snapshot", get(console::get_snapshot))
        .route("/v1/flights", get(console::list_flights))
        .route("/v1/conditions", get(console::list_conditions))
        .route("/v1/proposals", get(console::list_proposals))
        .route("/v1/proposals/approve", post(console::approve_all))
        .route("/v1/proposals/:id/reject", post(console::reject_proposal))
        .route("/v1/approvals", get(console::list_approvals))
        .route("/v1/scenarios", get(console::list_scenarios))
        .route("/v1/scenario", post(console::set_scenario))
        .route("/v1/ingest", post(console::ingest))
        .route("/v1/ws", get(ws::ws_handler))
}

#[cfg(test)]
mod tests;
