//! Scripted console sessions.

use anyhow::{Context, Result};
use reroute_core::{
    ApprovalState, ConsoleEngine, EngineConfig, Provider, RerouteProposal, RiskLevel,
    RiskSummary, ScenarioId,
};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write as _;
use std::path::PathBuf;

/// What to do during a headless run.
#[derive(Debug, Clone)]
pub struct SessionPlan {
    pub config: EngineConfig,
    pub scenario: ScenarioId,
    pub ticks: u64,
    /// Approve every open proposal once this many ticks have run
    pub approve_at: Option<u64>,
    pub feed: Option<(Provider, PathBuf)>,
}

impl Default for SessionPlan {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            scenario: ScenarioId::default(),
            ticks: 30,
            approve_at: None,
            feed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightLine {
    pub id: String,
    pub callsign: String,
    pub origin: String,
    pub destination: String,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub is_emergency: bool,
    pub frozen: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub scenario: ScenarioId,
    pub ticks: u64,
    pub approval: ApprovalState,
    pub summary: RiskSummary,
    pub flights: Vec<FlightLine>,
    pub open_proposals: Vec<RerouteProposal>,
    pub applied: Vec<RerouteProposal>,
}

/// Load a feed file into a fresh engine, or generate a synthetic fleet.
pub fn build_engine(plan: &SessionPlan) -> Result<ConsoleEngine> {
    let mut engine = ConsoleEngine::new(plan.config.clone(), plan.scenario);
    if let Some((provider, path)) = &plan.feed {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading feed {}", path.display()))?;
        let body: Value = serde_json::from_str(&raw)
            .with_context(|| format!("parsing feed {}", path.display()))?;
        engine.ingest(*provider, &body);
    }
    Ok(engine)
}

/// Advance one tick, approving when the plan says so.
pub fn step(engine: &mut ConsoleEngine, plan: &SessionPlan) {
    engine.on_tick();
    if plan.approve_at == Some(engine.tick_count()) {
        match engine.on_approve_all() {
            Ok(applied) => tracing::info!("Approved {} reroute(s)", applied.len()),
            Err(e) => tracing::warn!("Approve all refused at tick {}: {}", engine.tick_count(), e),
        }
    }
}

/// Run the whole plan without pacing.
pub fn run(plan: &SessionPlan) -> Result<SessionReport> {
    let mut engine = build_engine(plan)?;
    for _ in 0..plan.ticks {
        step(&mut engine, plan);
    }
    Ok(report(&engine))
}

pub fn report(engine: &ConsoleEngine) -> SessionReport {
    let snapshot = engine.snapshot();
    SessionReport {
        scenario: snapshot.scenario,
        ticks: snapshot.tick,
        approval: snapshot.approval,
        summary: snapshot.summary,
        flights: snapshot
            .flights
            .iter()
            .map(|f| FlightLine {
                id: f.id.clone(),
                callsign: f.callsign.clone(),
                origin: f.origin.clone(),
                destination: f.destination.clone(),
                risk_score: f.risk_score,
                risk_level: RiskLevel::from_score(f.risk_score),
                is_emergency: f.is_emergency,
                frozen: f.frozen,
            })
            .collect(),
        open_proposals: snapshot.proposals,
        applied: snapshot.applied,
    }
}

impl SessionReport {
    /// Plain-text table for the terminal.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "scenario={} ticks={} approval={:?}",
            self.scenario, self.ticks, self.approval
        );
        let _ = writeln!(
            out,
            "flights={} avg_risk={:.0}% peak_risk={:.0}%",
            self.summary.total_flights,
            self.summary.average_risk * 100.0,
            self.summary.max_risk * 100.0
        );
        let _ = writeln!(out);
        for f in &self.flights {
            let _ = writeln!(
                out,
                "{:<8} {:<8} {}->{} {:>4.0}% {:<8}{}{}",
                f.id,
                f.callsign,
                f.origin,
                f.destination,
                f.risk_score * 100.0,
                format!("{:?}", f.risk_level),
                if f.is_emergency { " EMERG" } else { "" },
                if f.frozen { " FROZEN" } else { "" },
            );
        }
        for (label, list) in [("open", &self.open_proposals), ("applied", &self.applied)] {
            if list.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\n{} proposals:", label);
            for p in list {
                let _ = writeln!(
                    out,
                    "  {} {}: {:.2} -> {:.2} via {}",
                    p.id, p.callsign, p.risk_before, p.risk_after, p.proposed_route
                );
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_and_reports_every_flight() {
        let plan = SessionPlan { ticks: 5, ..SessionPlan::default() };
        let report = run(&plan).unwrap();
        assert_eq!(report.ticks, 5);
        assert_eq!(report.flights.len(), plan.config.fleet_size);
        assert_eq!(report.approval, ApprovalState::Open);
        assert!(report.render().contains("scenario=wx ticks=5"));
    }

    #[test]
    fn same_plan_same_report() {
        let plan = SessionPlan { ticks: 12, ..SessionPlan::default() };
        let a = run(&plan).unwrap();
        let b = run(&plan).unwrap();
        let risks = |r: &SessionReport| r.flights.iter().map(|f| f.risk_score).collect::<Vec<_>>();
        assert_eq!(risks(&a), risks(&b));
    }

    #[test]
    fn approve_at_tick_freezes_proposed_flights() {
        // Synthetic flights score at least base + minimum speed risk (0.29),
        // so every flight is eligible at this threshold under any seed
        let plan = SessionPlan {
            config: EngineConfig { risk_threshold: 0.25, ..EngineConfig::default() },
            ticks: 5,
            approve_at: Some(2),
            ..SessionPlan::default()
        };

        let mut engine = build_engine(&plan).unwrap();
        step(&mut engine, &plan);
        assert_eq!(engine.proposals().len(), plan.config.fleet_size);

        let report = run(&plan).unwrap();
        assert_eq!(report.approval, ApprovalState::Locked);
        assert!(report.open_proposals.is_empty());
        assert_eq!(report.applied.len(), plan.config.fleet_size);
        assert!(report.flights.iter().all(|f| f.frozen));
        for applied in &report.applied {
            let line = report.flights.iter().find(|f| f.id == applied.flight_id).unwrap();
            assert_eq!(line.risk_score, applied.risk_after);
        }
    }

    #[test]
    fn approve_without_proposals_leaves_session_open() {
        let plan = SessionPlan {
            config: EngineConfig { risk_threshold: 1.01, ..EngineConfig::default() },
            ticks: 3,
            approve_at: Some(1),
            ..SessionPlan::default()
        };
        let report = run(&plan).unwrap();
        assert_eq!(report.approval, ApprovalState::Open);
        assert!(report.applied.is_empty());
        assert!(report.flights.iter().all(|f| !f.frozen));
    }

    #[test]
    fn missing_feed_file_is_an_error() {
        let plan = SessionPlan {
            feed: Some((Provider::Canonical, PathBuf::from("/nonexistent/feed.json"))),
            ..SessionPlan::default()
        };
        assert!(run(&plan).is_err());
    }
}
