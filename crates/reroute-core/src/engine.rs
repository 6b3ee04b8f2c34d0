//! Console engine: the single owner of all simulation state.
//!
//! Every trigger runs the same ordered pipeline after its own mutation:
//! risk, then conditions, then proposals. Callers only read snapshots and
//! dispatch triggers, so the frozen invariant is enforced here.

use chrono::{DateTime, NaiveDate, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use serde_json::Value;

use crate::animation::step_flights;
use crate::approval::{ApprovalState, ApprovalWorkflow};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::fleet::generate_fleet;
use crate::ingest::{ingest_feed, Provider};
use crate::models::{Condition, Flight, RerouteProposal};
use crate::proposal::{build_proposals, ProposalPolicy};
use crate::risk;
use crate::scenario::ScenarioId;

/// Aggregate risk figures for the console header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    pub total_flights: usize,
    pub average_risk: f64,
    pub max_risk: f64,
}

impl RiskSummary {
    pub fn from_flights(flights: &[Flight]) -> Self {
        if flights.is_empty() {
            return Self { total_flights: 0, average_risk: 0.0, max_risk: 0.0 };
        }
        let total: f64 = flights.iter().map(|f| f.risk_score).sum();
        let max = flights.iter().map(|f| f.risk_score).fold(0.0, f64::max);
        Self {
            total_flights: flights.len(),
            average_risk: total / flights.len() as f64,
            max_risk: max,
        }
    }
}

/// Read-only view of the engine handed to the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleSnapshot {
    pub tick: u64,
    pub scenario: ScenarioId,
    pub approval: ApprovalState,
    pub summary: RiskSummary,
    pub flights: Vec<Flight>,
    pub conditions: Vec<Condition>,
    pub proposals: Vec<RerouteProposal>,
    pub applied: Vec<RerouteProposal>,
    pub generated_at: DateTime<Utc>,
}

pub struct ConsoleEngine {
    config: EngineConfig,
    policy: ProposalPolicy,
    rng: ChaCha8Rng,
    tick: u64,
    date_of_flight: NaiveDate,

    flights: Vec<Flight>,
    scenario: ScenarioId,
    conditions: Vec<Condition>,
    proposals: Vec<RerouteProposal>,
    applied: Vec<RerouteProposal>,
    workflow: ApprovalWorkflow,
}

impl ConsoleEngine {
    /// Start a session with a synthetic fleet generated from `config.seed`.
    pub fn new(config: EngineConfig, scenario: ScenarioId) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let flights = generate_fleet(config.fleet_size, &mut rng);
        Self::from_parts(config, scenario, flights, rng)
    }

    /// Start a session with an explicit flight list.
    pub fn with_flights(config: EngineConfig, scenario: ScenarioId, flights: Vec<Flight>) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::from_parts(config, scenario, flights, rng)
    }

    fn from_parts(
        config: EngineConfig,
        scenario: ScenarioId,
        flights: Vec<Flight>,
        rng: ChaCha8Rng,
    ) -> Self {
        let mut engine = Self {
            policy: ProposalPolicy::from(&config),
            config,
            rng,
            tick: 0,
            date_of_flight: Utc::now().date_naive(),
            flights,
            scenario,
            conditions: Vec::new(),
            proposals: Vec::new(),
            applied: Vec::new(),
            workflow: ApprovalWorkflow::new(),
        };
        engine.recompute();
        tracing::info!(
            "Console engine started with {} flight(s), scenario {}",
            engine.flights.len(),
            engine.scenario
        );
        engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn flight(&self, id: &str) -> Option<&Flight> {
        self.flights.iter().find(|f| f.id == id)
    }

    pub fn scenario(&self) -> ScenarioId {
        self.scenario
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn proposals(&self) -> &[RerouteProposal] {
        &self.proposals
    }

    /// Proposals applied by the operator, in approval order.
    pub fn applied(&self) -> &[RerouteProposal] {
        &self.applied
    }

    pub fn approval_state(&self) -> ApprovalState {
        self.workflow.state()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Advance the animation one step and rerun the pipeline.
    pub fn on_tick(&mut self) -> usize {
        self.tick += 1;
        let moved = step_flights(
            &mut self.flights,
            self.config.progress_delta,
            self.config.altitude_amplitude_ft,
        );
        self.recompute();
        tracing::debug!(
            "Tick {}: moved {} flight(s), {} open proposal(s)",
            self.tick,
            moved,
            self.proposals.len()
        );
        moved
    }

    /// Switch the active scenario, starting a new epoch.
    ///
    /// Emergency flags and rejections from the previous scenario are
    /// cleared for every flight that is not frozen.
    pub fn on_scenario_change(&mut self, scenario: ScenarioId) {
        self.scenario = scenario;
        self.workflow.begin_epoch();
        for flight in self.flights.iter_mut().filter(|f| !f.frozen) {
            flight.is_emergency = false;
        }
        self.recompute();
        tracing::info!(
            "Scenario changed to {} ({} open proposal(s))",
            scenario,
            self.proposals.len()
        );
    }

    /// Apply every open proposal and lock the session.
    pub fn on_approve_all(&mut self) -> Result<Vec<RerouteProposal>, EngineError> {
        let applied = self.workflow.approve_all(
            &mut self.flights,
            &mut self.proposals,
            self.config.reroute_bend_factor,
        )?;
        self.applied.extend(applied.iter().cloned());
        self.recompute();
        tracing::info!("Approved {} reroute(s); session locked", applied.len());
        Ok(applied)
    }

    /// Reject one open proposal for the rest of this scenario epoch.
    pub fn reject_proposal(&mut self, proposal_id: &str) -> Result<RerouteProposal, EngineError> {
        let rejected = self.workflow.reject(&mut self.proposals, proposal_id)?;
        tracing::info!("Rejected proposal {} for {}", rejected.id, rejected.callsign);
        Ok(rejected)
    }

    /// Replace the fleet from an external feed.
    ///
    /// Frozen flights keep their state when the feed reports them again.
    pub fn ingest(&mut self, provider: Provider, body: &Value) -> usize {
        let incoming = ingest_feed(provider, body, self.config.fleet_size, &mut self.rng);
        let mut previous = std::mem::take(&mut self.flights);
        let mut retained = 0;

        self.flights = incoming
            .into_iter()
            .map(|flight| {
                match previous.iter().position(|f| f.frozen && f.id == flight.id) {
                    Some(idx) => {
                        retained += 1;
                        previous.swap_remove(idx)
                    }
                    None => flight,
                }
            })
            .collect();

        self.recompute();
        tracing::info!(
            "Ingested {} flight(s) from {} ({} frozen retained)",
            self.flights.len(),
            provider,
            retained
        );
        self.flights.len()
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        ConsoleSnapshot {
            tick: self.tick,
            scenario: self.scenario,
            approval: self.workflow.state(),
            summary: RiskSummary::from_flights(&self.flights),
            flights: self.flights.clone(),
            conditions: self.conditions.clone(),
            proposals: self.proposals.clone(),
            applied: self.applied.clone(),
            generated_at: Utc::now(),
        }
    }

    fn recompute(&mut self) {
        for flight in &mut self.flights {
            risk::apply(flight, self.scenario);
        }

        self.conditions = self.scenario.conditions();

        let workflow = &self.workflow;
        self.proposals = build_proposals(
            &self.flights,
            self.scenario,
            workflow.is_locked(),
            &self.policy,
            self.date_of_flight,
            Utc::now(),
        )
        .into_iter()
        .filter(|p| !workflow.is_rejected(&p.flight_id))
        .collect();
    }
}
