//! Aircraft ingestion from external feeds.
//!
//! Each provider shape has its own adapter producing an [`AircraftRecord`].
//! A final pass fills missing fields with bounded random defaults and pads
//! or truncates the list to the console's fleet size. Nothing here fails:
//! malformed records are skipped and an unusable feed yields the padded
//! synthetic fleet.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::airports;
use crate::error::EngineError;
use crate::fleet::{build_flight, FlightSeed};
use crate::models::{Flight, FlightStatus, GeoPoint};
use crate::path::{nearest_progress, position_at};

const FEET_PER_METER: f64 = 3.28084;
const KNOTS_PER_KMH: f64 = 0.539957;

const DEFAULT_LAT_RANGE: (f64, f64) = (37.0, 41.0);
const DEFAULT_LON_RANGE: (f64, f64) = (-122.0, -116.0);
const DEFAULT_ALTITUDE_RANGE_FT: (f64, f64) = (30_000.0, 38_000.0);
const DEFAULT_SPEED_RANGE_KTS: (f64, f64) = (420.0, 500.0);
const UNKNOWN_AIRPORT: &str = "UNKNOWN";
/// Progress stays below 1 so a flight reported at its destination does not wrap to the origin
const MAX_PROGRESS: f64 = 1.0 - 1e-6;

/// Known feed shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    AviationStack,
    Canonical,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Provider::AviationStack => "aviationstack",
            Provider::Canonical => "canonical",
        })
    }
}

impl FromStr for Provider {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aviationstack" => Ok(Provider::AviationStack),
            "canonical" => Ok(Provider::Canonical),
            _ => Err(EngineError::UnknownProvider(s.to_string())),
        }
    }
}

/// An AviationStack `/flights` item. Only the fields we read are modelled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AviationStackFlight {
    pub flight_date: Option<String>,
    pub flight_status: Option<String>,
    pub departure: Option<AviationStackEndpoint>,
    pub arrival: Option<AviationStackEndpoint>,
    pub flight: Option<AviationStackFlightNumber>,
    pub live: Option<AviationStackLive>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AviationStackEndpoint {
    pub airport: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AviationStackFlightNumber {
    pub number: Option<String>,
    pub iata: Option<String>,
    pub icao: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AviationStackLive {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Meters
    pub altitude: Option<f64>,
    /// km/h
    pub speed_horizontal: Option<f64>,
}

/// An already-normalized record, e.g. from an uploaded file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanonicalAircraft {
    pub id: Option<String>,
    pub callsign: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    #[serde(alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: Option<f64>,
    /// Feet
    #[serde(alias = "altitudeFt")]
    pub altitude: Option<f64>,
    #[serde(alias = "speed", alias = "groundSpeed")]
    pub speed_kts: Option<f64>,
    pub status: Option<String>,
    pub route: Option<String>,
}

/// One record from a feed, tagged by the adapter that parsed it.
#[derive(Debug, Clone)]
pub enum ProviderRecord {
    AviationStack(AviationStackFlight),
    Canonical(CanonicalAircraft),
}

/// Provider-independent aircraft record. `None` means the feed omitted it.
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftRecord {
    pub id: Option<String>,
    pub callsign: Option<String>,
    pub origin: Option<String>,
    pub origin_name: Option<String>,
    pub destination: Option<String>,
    pub destination_name: Option<String>,
    pub status: FlightStatus,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude_ft: Option<f64>,
    pub speed_kts: Option<f64>,
    pub route: Option<String>,
}

/// Fully defaulted record ready to become a [`Flight`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAircraft {
    pub id: String,
    pub callsign: String,
    pub origin: String,
    pub origin_name: Option<String>,
    pub destination: String,
    pub destination_name: Option<String>,
    pub status: FlightStatus,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_ft: f64,
    pub speed_kts: f64,
    pub route: Option<String>,
}

/// Split a feed body into provider records.
///
/// Accepts `{ "data": [...] }` or a bare array; anything else is empty.
pub fn parse_feed(provider: Provider, body: &Value) -> Vec<ProviderRecord> {
    let items: &[Value] = match body {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| match parse_record(provider, item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping malformed {} record #{}: {}", provider, idx, e);
                None
            }
        })
        .filter(|record| match record {
            ProviderRecord::AviationStack(f) => {
                f.live.is_some() || f.departure.is_some() || f.arrival.is_some()
            }
            ProviderRecord::Canonical(_) => true,
        })
        .collect()
}

fn parse_record(provider: Provider, item: &Value) -> Result<ProviderRecord, serde_json::Error> {
    Ok(match provider {
        Provider::AviationStack => ProviderRecord::AviationStack(AviationStackFlight::deserialize(item)?),
        Provider::Canonical => ProviderRecord::Canonical(CanonicalAircraft::deserialize(item)?),
    })
}

impl From<ProviderRecord> for AircraftRecord {
    fn from(record: ProviderRecord) -> Self {
        match record {
            ProviderRecord::AviationStack(f) => from_aviation_stack(f),
            ProviderRecord::Canonical(c) => from_canonical(c),
        }
    }
}

fn from_aviation_stack(f: AviationStackFlight) -> AircraftRecord {
    let dep = f.departure.unwrap_or_default();
    let arr = f.arrival.unwrap_or_default();
    let live = f.live.unwrap_or_default();
    let number = f.flight.unwrap_or_default();

    let callsign = non_empty(number.iata)
        .or_else(|| non_empty(number.icao))
        .or_else(|| non_empty(number.number));
    let id = callsign
        .as_ref()
        .map(|cs| format!("{}-{}", f.flight_date.as_deref().unwrap_or("LIVE"), cs));

    AircraftRecord {
        id,
        callsign,
        origin: non_empty(dep.icao).or_else(|| non_empty(dep.iata)),
        origin_name: non_empty(dep.airport),
        destination: non_empty(arr.icao).or_else(|| non_empty(arr.iata)),
        destination_name: non_empty(arr.airport),
        status: FlightStatus::from_provider(f.flight_status.as_deref()),
        latitude: live.latitude,
        longitude: live.longitude,
        // A zero reading means "not reported" in this feed
        altitude_ft: positive(live.altitude).map(|m| m * FEET_PER_METER),
        speed_kts: positive(live.speed_horizontal).map(|kmh| kmh * KNOTS_PER_KMH),
        route: None,
    }
}

fn from_canonical(c: CanonicalAircraft) -> AircraftRecord {
    AircraftRecord {
        id: non_empty(c.id),
        callsign: non_empty(c.callsign),
        origin: non_empty(c.origin),
        origin_name: None,
        destination: non_empty(c.destination),
        destination_name: None,
        status: FlightStatus::from_provider(c.status.as_deref()),
        latitude: c.latitude,
        longitude: c.longitude,
        altitude_ft: positive(c.altitude),
        speed_kts: positive(c.speed_kts),
        route: non_empty(c.route),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl AircraftRecord {
    /// Fill every missing field. `index` numbers generated callsigns.
    ///
    /// Reported ids are kept verbatim so a flight keeps its identity
    /// across feeds regardless of its position in the list.
    pub fn normalize<R: Rng>(self, index: usize, rng: &mut R) -> NormalizedAircraft {
        let callsign = self.callsign.unwrap_or_else(|| format!("FL{}", index + 1));
        let id = self.id.unwrap_or_else(|| format!("LIVE-{}", callsign));
        let latitude = finite(self.latitude)
            .filter(|lat| (-90.0..=90.0).contains(lat))
            .unwrap_or_else(|| rng.random_range(DEFAULT_LAT_RANGE.0..DEFAULT_LAT_RANGE.1));
        let longitude = finite(self.longitude)
            .filter(|lon| (-180.0..=180.0).contains(lon))
            .unwrap_or_else(|| rng.random_range(DEFAULT_LON_RANGE.0..DEFAULT_LON_RANGE.1));
        let altitude_ft = self.altitude_ft.unwrap_or_else(|| {
            rng.random_range(DEFAULT_ALTITUDE_RANGE_FT.0..DEFAULT_ALTITUDE_RANGE_FT.1)
        });
        let speed_kts = self.speed_kts.unwrap_or_else(|| {
            rng.random_range(DEFAULT_SPEED_RANGE_KTS.0..DEFAULT_SPEED_RANGE_KTS.1)
        });

        NormalizedAircraft {
            id,
            callsign,
            origin: self.origin.unwrap_or_else(|| UNKNOWN_AIRPORT.to_string()),
            origin_name: self.origin_name,
            destination: self.destination.unwrap_or_else(|| UNKNOWN_AIRPORT.to_string()),
            destination_name: self.destination_name,
            status: self.status,
            latitude,
            longitude,
            altitude_ft,
            speed_kts,
            route: self.route,
        }
    }
}

/// Pad with `SIM-n` aircraft or truncate so exactly `size` remain.
///
/// Padding clones the first record, fanning positions out around it; an
/// empty list is padded from a fixed KLAX-KJFK template.
pub fn ensure_fleet_size(mut aircraft: Vec<NormalizedAircraft>, size: usize) -> Vec<NormalizedAircraft> {
    if aircraft.len() >= size {
        aircraft.truncate(size);
        return aircraft;
    }

    let template = aircraft.first().cloned().unwrap_or_else(sim_template);
    let first_padded = if aircraft.is_empty() { 0 } else { aircraft.len() };
    for i in first_padded..size {
        let offset = i as f64 - 5.0;
        aircraft.push(NormalizedAircraft {
            id: format!("SIM-{}", i + 1),
            callsign: format!("SIM{}", i + 1),
            latitude: template.latitude + offset * 0.4,
            longitude: template.longitude + offset * 1.3,
            ..template.clone()
        });
    }
    aircraft
}

fn sim_template() -> NormalizedAircraft {
    NormalizedAircraft {
        id: "SIM-1".to_string(),
        callsign: "SIM1".to_string(),
        origin: "KLAX".to_string(),
        origin_name: Some("Los Angeles Intl".to_string()),
        destination: "KJFK".to_string(),
        destination_name: Some("John F. Kennedy Intl".to_string()),
        status: FlightStatus::Enroute,
        latitude: 36.0,
        longitude: -115.0,
        altitude_ft: 32_000.0,
        speed_kts: 430.0,
        route: None,
    }
}

impl NormalizedAircraft {
    /// Build the console flight with a generated path.
    ///
    /// Unknown airport codes resolve to the catalog default for the path
    /// but keep their reported code. The reported position is projected
    /// onto the generated path so animation continues from there.
    pub fn into_flight<R: Rng>(self, rng: &mut R) -> Flight {
        let origin = airports::lookup(&self.origin);
        let destination = airports::lookup(&self.destination);

        let mut flight = build_flight(
            FlightSeed {
                id: self.id,
                callsign: self.callsign,
                origin,
                destination,
                speed_kts: self.speed_kts,
                altitude_ft: self.altitude_ft,
                progress: 0.0,
                route: self.route,
            },
            rng,
        );

        flight.origin = self.origin;
        flight.destination = self.destination;
        flight.origin_name = self.origin_name.or(flight.origin_name);
        flight.destination_name = self.destination_name.or(flight.destination_name);
        flight.status = self.status;

        let reported = GeoPoint::new(self.latitude, self.longitude);
        flight.progress = nearest_progress(&flight.path, reported).min(MAX_PROGRESS);
        let position = position_at(&flight.path, flight.progress).unwrap_or(reported);
        flight.latitude = position.lat;
        flight.longitude = position.lon;
        flight
    }
}

/// Full ingestion pass: parse, normalize, size, and build flights.
pub fn ingest_feed<R: Rng>(provider: Provider, body: &Value, size: usize, rng: &mut R) -> Vec<Flight> {
    let normalized: Vec<NormalizedAircraft> = parse_feed(provider, body)
        .into_iter()
        .enumerate()
        .map(|(idx, record)| AircraftRecord::from(record).normalize(idx, rng))
        .collect();

    let mut seen = HashSet::new();
    ensure_fleet_size(normalized, size)
        .into_iter()
        .enumerate()
        .map(|(idx, mut aircraft)| {
            if !seen.insert(aircraft.id.clone()) {
                tracing::warn!("Duplicate aircraft id {} in {} feed", aircraft.id, provider);
                aircraft.id = format!("{}-{}", aircraft.id, idx);
                seen.insert(aircraft.id.clone());
            }
            aircraft.into_flight(rng)
        })
        .collect()
}
