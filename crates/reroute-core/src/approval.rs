//! Reroute approval lifecycle.
//!
//! `Open` accepts operator decisions on proposals. "Approve all" applies
//! every open proposal and moves the session to `Locked`, which is
//! terminal: no proposals are produced afterwards and every rerouted
//! flight is frozen.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::airports;
use crate::error::EngineError;
use crate::models::{Flight, RerouteProposal};
use crate::path::{build_rerouted_path, position_at};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalState {
    #[default]
    Open,
    Locked,
}

/// Approval state plus the operator's per-epoch rejections.
#[derive(Debug, Clone, Default)]
pub struct ApprovalWorkflow {
    state: ApprovalState,
    rejected: HashSet<String>,
}

impl ApprovalWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ApprovalState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == ApprovalState::Locked
    }

    /// Whether the operator rejected this flight's proposal in the current epoch.
    pub fn is_rejected(&self, flight_id: &str) -> bool {
        self.rejected.contains(flight_id)
    }

    /// Start a new scenario epoch; earlier rejections no longer apply.
    pub fn begin_epoch(&mut self) {
        self.rejected.clear();
    }

    /// Drop one proposal from the open set. Flight state is not touched.
    pub fn reject(
        &mut self,
        proposals: &mut Vec<RerouteProposal>,
        proposal_id: &str,
    ) -> Result<RerouteProposal, EngineError> {
        if self.is_locked() {
            return Err(EngineError::Locked);
        }
        let idx = proposals
            .iter()
            .position(|p| p.id == proposal_id)
            .ok_or_else(|| EngineError::ProposalNotFound(proposal_id.to_string()))?;

        let proposal = proposals.remove(idx);
        self.rejected.insert(proposal.flight_id.clone());
        Ok(proposal)
    }

    /// Apply every open proposal and lock the session.
    ///
    /// Returns the applied proposals with `applied` set. The open set is
    /// left empty.
    pub fn approve_all(
        &mut self,
        flights: &mut [Flight],
        proposals: &mut Vec<RerouteProposal>,
        bend_factor: f64,
    ) -> Result<Vec<RerouteProposal>, EngineError> {
        if self.is_locked() {
            return Err(EngineError::Locked);
        }
        if proposals.is_empty() {
            return Err(EngineError::NothingToApprove);
        }

        let mut applied = Vec::with_capacity(proposals.len());
        for mut proposal in proposals.drain(..) {
            let Some(flight) = flights.iter_mut().find(|f| f.id == proposal.flight_id) else {
                tracing::warn!(
                    "Proposal {} refers to unknown flight {}",
                    proposal.id,
                    proposal.flight_id
                );
                continue;
            };
            if flight.frozen {
                continue;
            }
            apply_reroute(flight, &proposal, bend_factor);
            proposal.applied = true;
            applied.push(proposal);
        }

        self.state = ApprovalState::Locked;
        self.rejected.clear();
        Ok(applied)
    }
}

/// Reroute and freeze one flight.
fn apply_reroute(flight: &mut Flight, proposal: &RerouteProposal, bend_factor: f64) {
    let origin = airports::lookup(&flight.origin);
    let destination = airports::lookup(&flight.destination);

    flight.route = Some(proposal.proposed_route.clone());
    flight.risk_score = proposal.risk_after;
    flight.path = build_rerouted_path(origin, destination, bend_factor);
    flight.progress = 0.0;
    flight.altitude = flight.base_altitude;
    if let Some(start) = position_at(&flight.path, 0.0) {
        flight.latitude = start.lat;
        flight.longitude = start.lon;
    }
    flight.frozen = true;
}
