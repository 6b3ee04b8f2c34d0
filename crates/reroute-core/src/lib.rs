//! Reroute Console engine.
//!
//! Simulated aircraft animation, scenario-driven risk scoring, reroute
//! proposals and the approve-all lock that freezes rerouted flights.

pub mod airports;
pub mod animation;
pub mod approval;
pub mod config;
pub mod engine;
pub mod error;
pub mod fleet;
pub mod icao;
pub mod ingest;
pub mod models;
pub mod path;
pub mod proposal;
pub mod risk;
pub mod scenario;

pub use airports::Airport;
pub use approval::{ApprovalState, ApprovalWorkflow};
pub use config::EngineConfig;
pub use engine::{ConsoleEngine, ConsoleSnapshot, RiskSummary};
pub use error::EngineError;
pub use ingest::Provider;
pub use models::{
    Condition, ConditionType, Flight, FlightPhase, FlightStatus, GeoPoint, RerouteProposal,
    RiskLevel, Severity,
};
pub use path::{build_rerouted_path, generate_initial_path, position_at};
pub use proposal::{build_proposals, ProposalPolicy};
pub use scenario::{EmergencyScenario, ScenarioId};
