//! Core data models for the reroute console.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scenario::ScenarioId;

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Coarse flight status as shown on the console.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightStatus {
    Scheduled,
    #[default]
    Enroute,
    Landed,
    Delayed,
    Cancelled,
}

impl FlightStatus {
    /// Map a provider status string onto the console's status set.
    ///
    /// Unknown or missing values are treated as enroute.
    pub fn from_provider(status: Option<&str>) -> Self {
        match status.unwrap_or_default().to_ascii_lowercase().as_str() {
            "active" => FlightStatus::Enroute,
            "landed" => FlightStatus::Landed,
            "scheduled" => FlightStatus::Scheduled,
            "cancelled" => FlightStatus::Cancelled,
            "incident" | "diverted" => FlightStatus::Delayed,
            _ => FlightStatus::Enroute,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightPhase {
    Climb,
    #[default]
    Cruise,
    Descent,
}

/// One simulated flight.
///
/// Fields are public for reading; mutation outside this crate should go
/// through [`crate::ConsoleEngine`] so the frozen invariant holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: String,
    pub callsign: String,

    pub origin: String,
    #[serde(default)]
    pub origin_name: Option<String>,
    pub destination: String,
    #[serde(default)]
    pub destination_name: Option<String>,

    pub status: FlightStatus,
    pub phase: FlightPhase,

    /// Feet, including the synthetic oscillation
    pub altitude: f64,
    /// Feet, captured at creation or reroute; the oscillation is applied on top
    pub base_altitude: f64,
    pub speed_kts: f64,
    pub latitude: f64,
    pub longitude: f64,

    /// 0-1, rounded to two decimals
    pub risk_score: f64,
    pub is_emergency: bool,
    /// Set on reroute approval; risk and route never change afterwards
    pub frozen: bool,

    pub path: Vec<GeoPoint>,
    /// 0-1 (exclusive) progress along `path`
    pub progress: f64,

    #[serde(default)]
    pub route: Option<String>,
}

impl Flight {
    /// Route string used for proposals, defaulting to a direct routing.
    pub fn route_or_direct(&self) -> String {
        self.route
            .clone()
            .unwrap_or_else(|| format!("{} DCT {}", self.origin, self.destination))
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    Weather,
    Runway,
    Staffing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Display-only operating condition derived from the active scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub id: String,
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    pub label: String,
    pub severity: Severity,
    pub description: String,
    pub active: bool,
}

/// A candidate reroute for one flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RerouteProposal {
    pub id: String,
    pub flight_id: String,
    pub callsign: String,
    pub scenario: ScenarioId,

    pub current_route: String,
    pub proposed_route: String,

    pub icao_before: String,
    pub icao_after: String,

    pub risk_before: f64,
    pub risk_after: f64,

    pub reason: String,
    pub created_at: DateTime<Utc>,

    pub applied: bool,
}

/// Display banding for a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Elevated,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        let percent = (score * 100.0).round();
        if percent >= 70.0 {
            RiskLevel::High
        } else if percent >= 40.0 {
            RiskLevel::Elevated
        } else {
            RiskLevel::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_status_mapping() {
        assert_eq!(FlightStatus::from_provider(Some("active")), FlightStatus::Enroute);
        assert_eq!(FlightStatus::from_provider(Some("LANDED")), FlightStatus::Landed);
        assert_eq!(FlightStatus::from_provider(Some("diverted")), FlightStatus::Delayed);
        assert_eq!(FlightStatus::from_provider(Some("incident")), FlightStatus::Delayed);
        assert_eq!(FlightStatus::from_provider(None), FlightStatus::Enroute);
    }

    #[test]
    fn risk_level_bands() {
        assert_eq!(RiskLevel::from_score(0.39), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.4), RiskLevel::Elevated);
        assert_eq!(RiskLevel::from_score(0.699), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::High);
    }
}
