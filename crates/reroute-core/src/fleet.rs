//! Synthetic fleet generation.

use rand::Rng;

use crate::airports::{self, Airport};
use crate::models::{Flight, FlightPhase, FlightStatus};
use crate::path::{generate_initial_path, position_at};

const INITIAL_RISK: f64 = 0.3;
const SPEED_RANGE_KTS: (f64, f64) = (380.0, 500.0);
const ALTITUDE_RANGE_FT: (f64, f64) = (14_000.0, 38_000.0);

/// Kinematic seed for a new flight.
#[derive(Debug, Clone)]
pub struct FlightSeed {
    pub id: String,
    pub callsign: String,
    pub origin: &'static Airport,
    pub destination: &'static Airport,
    pub speed_kts: f64,
    pub altitude_ft: f64,
    pub progress: f64,
    pub route: Option<String>,
}

/// Build a flight with a freshly generated path and position.
pub fn build_flight<R: Rng>(seed: FlightSeed, rng: &mut R) -> Flight {
    let path = generate_initial_path(seed.origin, seed.destination, rng);
    let progress = seed.progress.rem_euclid(1.0);
    let position = position_at(&path, progress).unwrap_or_else(|| seed.origin.point());

    Flight {
        id: seed.id,
        callsign: seed.callsign,
        origin: seed.origin.code.to_string(),
        origin_name: Some(seed.origin.name.to_string()),
        destination: seed.destination.code.to_string(),
        destination_name: Some(seed.destination.name.to_string()),
        status: FlightStatus::Enroute,
        phase: phase_for_altitude(seed.altitude_ft),
        altitude: seed.altitude_ft,
        base_altitude: seed.altitude_ft,
        speed_kts: seed.speed_kts,
        latitude: position.lat,
        longitude: position.lon,
        risk_score: INITIAL_RISK,
        is_emergency: false,
        frozen: false,
        path,
        progress,
        route: seed.route,
    }
}

/// Generate `count` flights between distinct catalog airports.
pub fn generate_fleet<R: Rng>(count: usize, rng: &mut R) -> Vec<Flight> {
    let catalog = airports::all();

    (0..count)
        .map(|i| {
            let origin_idx = rng.random_range(0..catalog.len());
            let offset = rng.random_range(1..catalog.len());
            let origin = &catalog[origin_idx];
            let destination = &catalog[(origin_idx + offset) % catalog.len()];
            let speed_kts: f64 = rng.random_range(SPEED_RANGE_KTS.0..SPEED_RANGE_KTS.1);
            let altitude_ft: f64 = rng.random_range(ALTITUDE_RANGE_FT.0..ALTITUDE_RANGE_FT.1);

            let seed = FlightSeed {
                id: format!("FL{}", i + 1),
                callsign: format!("FL{}", i + 1),
                origin,
                destination,
                speed_kts: speed_kts.round(),
                altitude_ft: (altitude_ft / 100.0).round() * 100.0,
                progress: rng.random_range(0.0..1.0),
                route: Some(format!("{} DCT {}", origin.code, destination.code)),
            };
            build_flight(seed, rng)
        })
        .collect()
}

pub(crate) fn phase_for_altitude(altitude_ft: f64) -> FlightPhase {
    if altitude_ft < 20_000.0 {
        FlightPhase::Climb
    } else {
        FlightPhase::Cruise
    }
}

#[cfg(test)]
pub(crate) fn test_flight(id: &str, speed_kts: f64, altitude_ft: f64) -> Flight {
    use rand::SeedableRng;

    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
    let mut flight = build_flight(
        FlightSeed {
            id: id.to_string(),
            callsign: id.to_string(),
            origin: airports::lookup("KLAX"),
            destination: airports::lookup("KSFO"),
            speed_kts,
            altitude_ft,
            progress: 0.0,
            route: Some("KLAX DCT KSFO".to_string()),
        },
        &mut rng,
    );
    flight.longitude = -118.0;
    flight
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn generates_requested_count_with_distinct_endpoints() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let fleet = generate_fleet(10, &mut rng);
        assert_eq!(fleet.len(), 10);
        for flight in &fleet {
            assert_ne!(flight.origin, flight.destination);
            assert_eq!(flight.path.len(), 3);
            assert!((0.0..1.0).contains(&flight.progress));
            assert!(!flight.frozen);
        }
    }

    #[test]
    fn fleet_is_reproducible_from_seed() {
        let a = generate_fleet(5, &mut ChaCha8Rng::seed_from_u64(9));
        let b = generate_fleet(5, &mut ChaCha8Rng::seed_from_u64(9));
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.path, y.path);
            assert_eq!(x.speed_kts, y.speed_kts);
            assert_eq!(x.origin, y.origin);
        }
    }
}
