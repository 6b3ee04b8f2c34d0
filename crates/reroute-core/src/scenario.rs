//! Emergency scenarios and the conditions they put on the console.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::models::{Condition, ConditionType, Severity};

/// The active emergency scenario. Exactly one is selected at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioId {
    #[default]
    Wx,
    Runway,
    Staffing,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 3] = [ScenarioId::Wx, ScenarioId::Runway, ScenarioId::Staffing];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioId::Wx => "wx",
            ScenarioId::Runway => "runway",
            ScenarioId::Staffing => "staffing",
        }
    }

    pub fn condition_type(&self) -> ConditionType {
        match self {
            ScenarioId::Wx => ConditionType::Weather,
            ScenarioId::Runway => ConditionType::Runway,
            ScenarioId::Staffing => ConditionType::Staffing,
        }
    }

    pub fn descriptor(&self) -> EmergencyScenario {
        let (name, description) = match self {
            ScenarioId::Wx => (
                "Severe weather",
                "Convective line crossing the central sector corridor.",
            ),
            ScenarioId::Runway => (
                "Runway closure",
                "Primary arrival runways closed at major hubs.",
            ),
            ScenarioId::Staffing => (
                "Staffing shortage",
                "Eastern sectors operating below minimum staffing.",
            ),
        };

        EmergencyScenario {
            id: *self,
            name: name.to_string(),
            description: description.to_string(),
            scenario_type: self.condition_type(),
        }
    }

    /// Reason attached to every proposal raised under this scenario.
    pub fn reroute_reason(&self) -> &'static str {
        match self {
            ScenarioId::Wx => "Avoids convective activity in the corridor.",
            ScenarioId::Runway => "Sequences the arrival away from the closed runway.",
            ScenarioId::Staffing => "Moves traffic out of the short-staffed sector.",
        }
    }

    /// Synthetic fix inserted into rerouted route strings.
    pub fn reroute_fix(&self) -> &'static str {
        match self {
            ScenarioId::Wx => "WXDEV",
            ScenarioId::Runway => "RWYALT",
            ScenarioId::Staffing => "FLOWX",
        }
    }

    /// Conditions shown while this scenario is active.
    pub fn conditions(&self) -> Vec<Condition> {
        let specs: &[(&str, &str, Severity, &str)] = match self {
            ScenarioId::Wx => &[
                (
                    "wx-1",
                    "Convective SIGMET",
                    Severity::High,
                    "Thunderstorm line across central sector corridor.",
                ),
                (
                    "wx-2",
                    "Moderate turbulence",
                    Severity::Medium,
                    "Reports of moderate chop below FL200 near the storm line.",
                ),
            ],
            ScenarioId::Runway => &[
                (
                    "rwy-1",
                    "Runway closure",
                    Severity::High,
                    "Primary arrival runways closed at KJFK and KORD.",
                ),
                (
                    "rwy-2",
                    "Arrival metering",
                    Severity::Medium,
                    "Ground delay program in effect for affected hubs.",
                ),
            ],
            ScenarioId::Staffing => &[(
                "staff-1",
                "Reduced staffing",
                Severity::Medium,
                "Sector staffed with 2 of 3 controllers.",
            )],
        };

        specs
            .iter()
            .map(|(id, label, severity, description)| Condition {
                id: id.to_string(),
                condition_type: self.condition_type(),
                label: label.to_string(),
                severity: *severity,
                description: description.to_string(),
                active: true,
            })
            .collect()
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wx" | "weather" => Ok(ScenarioId::Wx),
            "runway" => Ok(ScenarioId::Runway),
            "staffing" => Ok(ScenarioId::Staffing),
            _ => Err(EngineError::UnknownScenario(s.to_string())),
        }
    }
}

/// Display descriptor for a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyScenario {
    pub id: ScenarioId,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub scenario_type: ConditionType,
}

/// Descriptors for every scenario, in selection order.
pub fn catalog() -> Vec<EmergencyScenario> {
    ScenarioId::ALL.iter().map(ScenarioId::descriptor).collect()
}
