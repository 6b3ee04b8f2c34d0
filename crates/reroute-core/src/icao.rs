//! ICAO-style flight plan text.
//!
//! Six-line block:
//!
//! ```text
//! FPL-AA123-IS
//! -C/B738/M-SDFGIRWY/S
//! -KLAX0800
//! -N0450F350 KLAX DCT FIX1 KJFK
//! -KJFK0512
//! -DOF/250115
//! ```

use chrono::NaiveDate;

use crate::models::Flight;
use crate::path::path_length;

pub const DEFAULT_AIRCRAFT_TYPE: &str = "B738";
pub const DEFAULT_WAKE_CATEGORY: &str = "M";
pub const DEFAULT_EQUIPMENT: &str = "SDFGIRWY/S";
pub const DEFAULT_DEPARTURE_TIME: &str = "0800";
/// Cruise level issued with a reroute clearance.
pub const REROUTE_LEVEL: &str = "F310";
const REROUTE_LEVEL_FALLBACK: &str = "F290";
const NM_PER_DEGREE: f64 = 60.0;

/// Field values for one flight plan block.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightPlanText {
    pub callsign: String,
    pub aircraft_type: String,
    pub wake_category: String,
    pub equipment: String,
    pub origin: String,
    pub departure_time: String,
    pub speed: String,
    pub level: String,
    pub route: String,
    pub destination: String,
    pub elapsed_time: String,
    pub date_of_flight: NaiveDate,
}

impl FlightPlanText {
    /// Plan for a flight flying `route` at its current speed and level.
    pub fn for_flight(flight: &Flight, route: &str, date_of_flight: NaiveDate) -> Self {
        Self {
            callsign: flight.callsign.clone(),
            aircraft_type: DEFAULT_AIRCRAFT_TYPE.to_string(),
            wake_category: DEFAULT_WAKE_CATEGORY.to_string(),
            equipment: DEFAULT_EQUIPMENT.to_string(),
            origin: flight.origin.clone(),
            departure_time: DEFAULT_DEPARTURE_TIME.to_string(),
            speed: speed_field(flight.speed_kts),
            level: level_field(flight.base_altitude),
            route: route.to_string(),
            destination: flight.destination.clone(),
            elapsed_time: elapsed_time(path_length(&flight.path), flight.speed_kts),
            date_of_flight,
        }
    }

    /// Replace the level with the reroute clearance level.
    ///
    /// The clearance always differs from the filed level.
    pub fn with_reroute_level(mut self) -> Self {
        self.level = if self.level == REROUTE_LEVEL {
            REROUTE_LEVEL_FALLBACK.to_string()
        } else {
            REROUTE_LEVEL.to_string()
        };
        self
    }

    pub fn render(&self) -> String {
        [
            format!("FPL-{}-IS", self.callsign),
            format!(
                "-C/{}/{}-{}",
                self.aircraft_type, self.wake_category, self.equipment
            ),
            format!("-{}{}", self.origin, self.departure_time),
            format!("-{}{} {}", self.speed, self.level, self.route),
            format!("-{}{}", self.destination, self.elapsed_time),
            format!("-DOF/{}", self.date_of_flight.format("%y%m%d")),
        ]
        .join("\n")
    }
}

/// Knots rounded to the nearest ten, e.g. `N0450`.
pub fn speed_field(speed_kts: f64) -> String {
    format!("N{:04}", round_to_tens(speed_kts))
}

/// Flight level from feet, in tens of hundreds of feet, e.g. 35,000 ft -> `F350`.
pub fn level_field(altitude_ft: f64) -> String {
    let thousands = if altitude_ft.is_finite() {
        (altitude_ft / 1000.0).round().max(0.0) as u32
    } else {
        0
    };
    format!("F{:03}", thousands * 10)
}

/// HHMM estimate for covering `length_deg` of path at `speed_kts`.
pub fn elapsed_time(length_deg: f64, speed_kts: f64) -> String {
    if speed_kts.is_nan() || speed_kts <= 0.0 || !length_deg.is_finite() {
        return "0000".to_string();
    }
    let minutes = (length_deg * NM_PER_DEGREE / speed_kts * 60.0).round() as u64;
    format!("{:02}{:02}", (minutes / 60).min(99), minutes % 60)
}

fn round_to_tens(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        ((value / 10.0).round() * 10.0) as u32
    } else {
        0
    }
}
