//! Per-flight risk scoring against the active scenario.
//!
//! The score is a sum of independent terms:
//!
//! | term            | value                                          |
//! |-----------------|------------------------------------------------|
//! | base            | 0.20                                           |
//! | speed           | 0.30 scaled linearly from 350 kt to 450 kt     |
//! | low altitude    | 0.15 below 20,000 ft                           |
//! | scenario        | 0.35 when the scenario predicate matches       |
//!
//! The sum is clamped to `[0, 1]` and rounded to two decimals.

use crate::models::Flight;
use crate::scenario::ScenarioId;

pub const BASE_RISK: f64 = 0.2;
pub const SPEED_FLOOR_KTS: f64 = 350.0;
pub const SPEED_CEILING_KTS: f64 = 450.0;
pub const SPEED_RISK: f64 = 0.3;
pub const LOW_ALTITUDE_FT: f64 = 20_000.0;
pub const LOW_ALTITUDE_RISK: f64 = 0.15;
pub const SCENARIO_RISK: f64 = 0.35;

/// Longitude band of the convective line.
pub const WEATHER_BAND_LON: (f64, f64) = (-112.0, -100.0);
/// Destinations with closed arrival runways.
pub const CLOSED_RUNWAY_DESTINATIONS: &[&str] = &["KJFK", "KORD"];
/// Traffic east of this longitude is in the short-staffed sectors.
pub const STAFFING_EAST_OF_LON: f64 = -95.0;

/// Result of scoring one flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub score: f64,
    pub scenario_match: bool,
    /// Scenario matched and the score reached that scenario's emergency trigger
    pub emergency: bool,
}

/// Score a flight. Frozen flights keep their existing score.
pub fn assess(flight: &Flight, scenario: ScenarioId) -> RiskAssessment {
    if flight.frozen {
        return RiskAssessment {
            score: flight.risk_score,
            scenario_match: false,
            emergency: flight.is_emergency,
        };
    }

    let scenario_match = scenario_matches(flight, scenario);
    let mut raw = BASE_RISK + speed_risk(flight.speed_kts) + altitude_risk(flight.altitude);
    if scenario_match {
        raw += SCENARIO_RISK;
    }

    let score = round2(raw.clamp(0.0, 1.0));
    RiskAssessment {
        score,
        scenario_match,
        emergency: scenario_match && score >= emergency_trigger(scenario),
    }
}

/// Rescore a flight in place, leaving frozen flights untouched.
///
/// The emergency flag only ever latches on; clearing it is the caller's
/// job when a new scenario epoch starts.
pub fn apply(flight: &mut Flight, scenario: ScenarioId) {
    if flight.frozen {
        return;
    }
    let assessment = assess(flight, scenario);
    flight.risk_score = assessment.score;
    if assessment.emergency {
        flight.is_emergency = true;
    }
}

/// Score at which a matching flight is flagged as an emergency.
pub fn emergency_trigger(scenario: ScenarioId) -> f64 {
    match scenario {
        ScenarioId::Wx => 0.7,
        ScenarioId::Runway => 0.65,
        ScenarioId::Staffing => 0.75,
    }
}

pub fn scenario_matches(flight: &Flight, scenario: ScenarioId) -> bool {
    match scenario {
        ScenarioId::Wx => {
            let (west, east) = WEATHER_BAND_LON;
            (west..=east).contains(&flight.longitude)
        }
        ScenarioId::Runway => CLOSED_RUNWAY_DESTINATIONS
            .iter()
            .any(|code| code.eq_ignore_ascii_case(&flight.destination)),
        ScenarioId::Staffing => flight.longitude > STAFFING_EAST_OF_LON,
    }
}

fn speed_risk(speed_kts: f64) -> f64 {
    if !speed_kts.is_finite() {
        return if speed_kts > 0.0 { SPEED_RISK } else { 0.0 };
    }
    let span = SPEED_CEILING_KTS - SPEED_FLOOR_KTS;
    SPEED_RISK * ((speed_kts - SPEED_FLOOR_KTS) / span).clamp(0.0, 1.0)
}

fn altitude_risk(altitude_ft: f64) -> f64 {
    if altitude_ft < LOW_ALTITUDE_FT {
        LOW_ALTITUDE_RISK
    } else {
        0.0
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::test_flight;

    #[test]
    fn weather_band_fast_and_low_saturates() {
        let mut flight = test_flight("T1", 450.0, 15_000.0);
        flight.longitude = -105.0;

        // 0.20 + 0.30 + 0.15 + 0.35 = 1.00
        let a = assess(&flight, ScenarioId::Wx);
        assert!(a.scenario_match);
        assert_eq!(a.score, 1.0);
        assert!(a.emergency);
    }

    #[test]
    fn cruise_outside_band_is_base_plus_speed() {
        let mut flight = test_flight("T2", 400.0, 33_000.0);
        flight.longitude = -118.0;

        // 0.20 + 0.30 * 0.5
        let a = assess(&flight, ScenarioId::Wx);
        assert!(!a.scenario_match);
        assert_eq!(a.score, 0.35);
        assert!(!a.emergency);
    }

    #[test]
    fn slow_high_flight_scores_base_only() {
        let flight = test_flight("T3", 300.0, 36_000.0);
        assert_eq!(assess(&flight, ScenarioId::Staffing).score, 0.2);
    }

    #[test]
    fn runway_matches_destination() {
        let mut flight = test_flight("T4", 450.0, 30_000.0);
        flight.destination = "kord".into();
        let a = assess(&flight, ScenarioId::Runway);
        assert!(a.scenario_match);
        assert_eq!(a.score, 0.85);
        assert!(a.emergency);
    }

    #[test]
    fn staffing_matches_eastern_longitudes() {
        let mut flight = test_flight("T5", 420.0, 30_000.0);
        flight.longitude = -80.0;
        let a = assess(&flight, ScenarioId::Staffing);
        assert!(a.scenario_match);
        // 0.20 + 0.21 + 0.35
        assert_eq!(a.score, 0.76);
        assert!(a.emergency);
    }

    #[test]
    fn extreme_inputs_stay_in_unit_range() {
        let cases = [
            (f64::INFINITY, -1.0e9),
            (f64::NEG_INFINITY, 1.0e9),
            (1.0e12, 0.0),
            (-500.0, -500.0),
            (f64::NAN, 10_000.0),
        ];
        for (speed, altitude) in cases {
            let mut flight = test_flight("X", speed, altitude);
            flight.longitude = -105.0;
            for scenario in ScenarioId::ALL {
                let score = assess(&flight, scenario).score;
                assert!((0.0..=1.0).contains(&score), "score {score} for {speed}/{altitude}");
            }
        }
    }

    #[test]
    fn frozen_flight_is_never_rescored() {
        let mut flight = test_flight("F", 480.0, 10_000.0);
        flight.longitude = -105.0;
        flight.frozen = true;
        flight.risk_score = 0.4;
        flight.route = Some("KLAX DCT WXDEV DCT KJFK".into());

        for scenario in ScenarioId::ALL {
            apply(&mut flight, scenario);
            assert_eq!(assess(&flight, scenario).score, 0.4);
        }
        assert_eq!(flight.risk_score, 0.4);
        assert_eq!(flight.route.as_deref(), Some("KLAX DCT WXDEV DCT KJFK"));
    }

    #[test]
    fn emergency_flag_latches_within_epoch() {
        let mut flight = test_flight("E", 450.0, 15_000.0);
        flight.longitude = -105.0;
        apply(&mut flight, ScenarioId::Wx);
        assert!(flight.is_emergency);

        flight.longitude = -118.0;
        apply(&mut flight, ScenarioId::Wx);
        assert_eq!(flight.risk_score, 0.65);
        assert!(flight.is_emergency);
    }
}
