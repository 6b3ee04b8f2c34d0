//! Reroute proposal generation.

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::EngineConfig;
use crate::icao::FlightPlanText;
use crate::models::{Flight, RerouteProposal};
use crate::risk::round2;
use crate::scenario::ScenarioId;

const DIRECT: &str = "DCT";

/// Eligibility and risk-reduction policy for proposals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProposalPolicy {
    pub risk_threshold: f64,
    pub risk_reduction_factor: f64,
}

impl From<&EngineConfig> for ProposalPolicy {
    fn from(config: &EngineConfig) -> Self {
        Self {
            risk_threshold: config.risk_threshold,
            risk_reduction_factor: config.risk_reduction_factor,
        }
    }
}

impl Default for ProposalPolicy {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

/// Build proposals for every non-frozen flight at or above the risk threshold.
///
/// A locked session yields no proposals. Output order follows `flights`.
/// Apart from `created_at`, the result depends only on the inputs.
pub fn build_proposals(
    flights: &[Flight],
    scenario: ScenarioId,
    locked: bool,
    policy: &ProposalPolicy,
    date_of_flight: NaiveDate,
    created_at: DateTime<Utc>,
) -> Vec<RerouteProposal> {
    if locked {
        return Vec::new();
    }

    flights
        .iter()
        .filter(|f| !f.frozen && f.risk_score >= policy.risk_threshold)
        .map(|f| build_proposal(f, scenario, policy, date_of_flight, created_at))
        .collect()
}

fn build_proposal(
    flight: &Flight,
    scenario: ScenarioId,
    policy: &ProposalPolicy,
    date_of_flight: NaiveDate,
    created_at: DateTime<Utc>,
) -> RerouteProposal {
    let current_route = flight.route_or_direct();
    let proposed_route = insert_reroute_fix(
        &current_route,
        scenario.reroute_fix(),
        &flight.origin,
        &flight.destination,
    );

    let icao_before = FlightPlanText::for_flight(flight, &current_route, date_of_flight).render();
    let icao_after = FlightPlanText::for_flight(flight, &proposed_route, date_of_flight)
        .with_reroute_level()
        .render();

    let risk_after = round2((flight.risk_score * policy.risk_reduction_factor).clamp(0.0, 1.0));

    RerouteProposal {
        id: proposal_id(&flight.id),
        flight_id: flight.id.clone(),
        callsign: flight.callsign.clone(),
        scenario,
        current_route,
        proposed_route,
        icao_before,
        icao_after,
        risk_before: flight.risk_score,
        risk_after,
        reason: scenario.reroute_reason().to_string(),
        created_at,
        applied: false,
    }
}

pub fn proposal_id(flight_id: &str) -> String {
    format!("prop-{flight_id}")
}

/// Insert `fix` after the first direct-routing marker, e.g.
/// `KLAX DCT KJFK` becomes `KLAX DCT WXDEV DCT KJFK`.
///
/// Routes without a marker get `DCT fix DCT` before their last token; an
/// unusable route is rebuilt from the endpoints.
pub fn insert_reroute_fix(route: &str, fix: &str, origin: &str, destination: &str) -> String {
    let mut tokens: Vec<&str> = route.split_whitespace().collect();

    if let Some(idx) = tokens.iter().position(|t| t.eq_ignore_ascii_case(DIRECT)) {
        tokens.splice(idx + 1..idx + 1, [fix, DIRECT]);
    } else if tokens.len() >= 2 {
        let last = tokens.len() - 1;
        tokens.splice(last..last, [DIRECT, fix, DIRECT]);
    } else {
        return format!("{origin} {DIRECT} {fix} {DIRECT} {destination}");
    }

    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::test_flight;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn risky(id: &str, risk: f64) -> Flight {
        let mut f = test_flight(id, 450.0, 35_000.0);
        f.risk_score = risk;
        f
    }

    #[test]
    fn filters_on_threshold_and_frozen() {
        let mut frozen = risky("F3", 0.9);
        frozen.frozen = true;
        let flights = vec![risky("F1", 0.6), risky("F2", 0.59), frozen, risky("F4", 1.0)];

        let proposals = build_proposals(
            &flights,
            ScenarioId::Wx,
            false,
            &ProposalPolicy::default(),
            date(),
            Utc::now(),
        );
        let ids: Vec<&str> = proposals.iter().map(|p| p.flight_id.as_str()).collect();
        assert_eq!(ids, vec!["F1", "F4"]);
    }

    #[test]
    fn locked_session_yields_nothing() {
        let flights = vec![risky("F1", 0.95), risky("F2", 0.8)];
        for scenario in ScenarioId::ALL {
            assert!(build_proposals(
                &flights,
                scenario,
                true,
                &ProposalPolicy::default(),
                date(),
                Utc::now()
            )
            .is_empty());
        }
    }

    #[test]
    fn proposal_contents() {
        let flights = vec![risky("AA123", 0.85)];
        let p = &build_proposals(
            &flights,
            ScenarioId::Wx,
            false,
            &ProposalPolicy::default(),
            date(),
            Utc::now(),
        )[0];

        assert_eq!(p.id, "prop-AA123");
        assert_eq!(p.current_route, "KLAX DCT KSFO");
        assert_eq!(p.proposed_route, "KLAX DCT WXDEV DCT KSFO");
        assert_eq!(p.risk_before, 0.85);
        assert_eq!(p.risk_after, 0.34);
        assert_eq!(p.reason, ScenarioId::Wx.reroute_reason());
        assert!(p.icao_before.contains("-N0450F350 KLAX DCT KSFO"));
        assert!(p.icao_after.contains("-N0450F310 KLAX DCT WXDEV DCT KSFO"));
        assert!(!p.applied);
    }

    #[test]
    fn recomputation_is_stable() {
        let flights = vec![risky("A", 0.7), risky("B", 0.65)];
        let policy = ProposalPolicy::default();
        let first = build_proposals(&flights, ScenarioId::Runway, false, &policy, date(), Utc::now());
        let second = build_proposals(&flights, ScenarioId::Runway, false, &policy, date(), Utc::now());

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.risk_before, b.risk_before);
            assert_eq!(a.risk_after, b.risk_after);
            assert_eq!(a.current_route, b.current_route);
            assert_eq!(a.proposed_route, b.proposed_route);
            assert_eq!(a.icao_before, b.icao_before);
            assert_eq!(a.icao_after, b.icao_after);
        }
    }

    #[test]
    fn fix_insertion_variants() {
        assert_eq!(
            insert_reroute_fix("KLAX DCT FIX1 KJFK", "RR1", "KLAX", "KJFK"),
            "KLAX DCT RR1 DCT FIX1 KJFK"
        );
        assert_eq!(
            insert_reroute_fix("KLAX J80 KJFK", "RR1", "KLAX", "KJFK"),
            "KLAX J80 DCT RR1 DCT KJFK"
        );
        assert_eq!(
            insert_reroute_fix("  ", "RR1", "KLAX", "KJFK"),
            "KLAX DCT RR1 DCT KJFK"
        );
    }
}
