//! Console read views and operator triggers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use reroute_core::{
    scenario, Condition, ConsoleSnapshot, Flight, Provider, RerouteProposal, ScenarioId,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::state::AppState;

pub async fn get_snapshot(State(state): State<Arc<AppState>>) -> Json<ConsoleSnapshot> {
    Json(state.snapshot())
}

pub async fn list_flights(State(state): State<Arc<AppState>>) -> Json<Vec<Flight>> {
    Json(state.engine().flights().to_vec())
}

pub async fn list_conditions(State(state): State<Arc<AppState>>) -> Json<Vec<Condition>> {
    Json(state.engine().conditions().to_vec())
}

pub async fn list_proposals(State(state): State<Arc<AppState>>) -> Json<Vec<RerouteProposal>> {
    Json(state.engine().proposals().to_vec())
}

/// Applied reroute history.
pub async fn list_approvals(State(state): State<Arc<AppState>>) -> Json<Vec<RerouteProposal>> {
    Json(state.engine().applied().to_vec())
}

pub async fn list_scenarios() -> impl IntoResponse {
    Json(scenario::catalog())
}

#[derive(Debug, Deserialize)]
pub struct ScenarioRequest {
    pub id: String,
}

pub async fn set_scenario(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScenarioRequest>,
) -> Result<Json<ConsoleSnapshot>, ApiError> {
    let scenario: ScenarioId = req.id.parse()?;
    let ((), snapshot) = state.mutate(|engine| engine.on_scenario_change(scenario));
    Ok(Json(snapshot))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveResponse {
    pub applied: Vec<RerouteProposal>,
    pub snapshot: ConsoleSnapshot,
}

pub async fn approve_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApproveResponse>, ApiError> {
    let (result, snapshot) = state.mutate(|engine| engine.on_approve_all());
    let applied = result?;
    Ok(Json(ApproveResponse { applied, snapshot }))
}

pub async fn reject_proposal(
    State(state): State<Arc<AppState>>,
    Path(proposal_id): Path<String>,
) -> Result<Json<RerouteProposal>, ApiError> {
    let (result, _snapshot) = state.mutate(|engine| engine.reject_proposal(&proposal_id));
    Ok(Json(result?))
}

#[derive(Debug, Deserialize, Default)]
pub struct IngestQuery {
    pub provider: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub provider: Provider,
    pub flights: usize,
}

pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IngestQuery>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let provider: Provider = match query.provider.as_deref() {
        Some(name) => name.parse()?,
        None => Provider::AviationStack,
    };
    let (flights, _snapshot) = state.mutate(|engine| engine.ingest(provider, &body));
    Ok((StatusCode::ACCEPTED, Json(IngestResponse { provider, flights })))
}
