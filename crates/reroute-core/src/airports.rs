//! Static airport catalog.

use serde::Serialize;

use crate::models::GeoPoint;

/// A named location that flights depart from or arrive at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Airport {
    pub code: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Airport {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Code of the entry returned for unknown lookups.
pub const DEFAULT_AIRPORT_CODE: &str = "KLAX";

const AIRPORTS: &[Airport] = &[
    Airport { code: "KLAX", name: "Los Angeles Intl", lat: 33.9416, lon: -118.4085 },
    Airport { code: "KSFO", name: "San Francisco Intl", lat: 37.6213, lon: -122.3790 },
    Airport { code: "KSEA", name: "Seattle-Tacoma Intl", lat: 47.4502, lon: -122.3088 },
    Airport { code: "KLAS", name: "Harry Reid Intl", lat: 36.0840, lon: -115.1537 },
    Airport { code: "KPHX", name: "Phoenix Sky Harbor Intl", lat: 33.4342, lon: -112.0116 },
    Airport { code: "KDEN", name: "Denver Intl", lat: 39.8561, lon: -104.6737 },
    Airport { code: "KDFW", name: "Dallas/Fort Worth Intl", lat: 32.8998, lon: -97.0403 },
    Airport { code: "KORD", name: "Chicago O'Hare Intl", lat: 41.9742, lon: -87.9073 },
    Airport { code: "KATL", name: "Hartsfield-Jackson Atlanta Intl", lat: 33.6407, lon: -84.4277 },
    Airport { code: "KJFK", name: "John F. Kennedy Intl", lat: 40.6413, lon: -73.7781 },
];

/// All catalog entries, in a stable order.
pub fn all() -> &'static [Airport] {
    AIRPORTS
}

/// Look up an airport by ICAO code (case-insensitive).
pub fn find(code: &str) -> Option<&'static Airport> {
    AIRPORTS.iter().find(|a| a.code.eq_ignore_ascii_case(code.trim()))
}

/// Look up an airport, falling back to the default entry for unknown codes.
pub fn lookup(code: &str) -> &'static Airport {
    find(code).unwrap_or(&AIRPORTS[0])
}
