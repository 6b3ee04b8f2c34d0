//! Per-tick animation of flight positions.

use std::f64::consts::TAU;

use crate::models::Flight;
use crate::path::position_at;

/// Advance progress by `delta`, wrapping into `[0, 1)`.
pub fn advance_progress(progress: f64, delta: f64) -> f64 {
    let next = (progress + delta).rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if next >= 1.0 || !next.is_finite() {
        0.0
    } else {
        next
    }
}

/// Synthetic altitude for a given progress, oscillating around the baseline.
pub fn oscillated_altitude(base_altitude: f64, amplitude_ft: f64, progress: f64) -> f64 {
    base_altitude + amplitude_ft * (TAU * progress).sin()
}

/// Move one flight along its path. Returns false if the flight has no usable path.
///
/// Frozen flights still move; only position, progress and altitude are
/// written here.
pub fn step_flight(flight: &mut Flight, delta: f64, amplitude_ft: f64) -> bool {
    if flight.path.len() < 2 {
        return false;
    }

    let progress = advance_progress(flight.progress, delta);
    let Some(position) = position_at(&flight.path, progress) else {
        return false;
    };

    flight.progress = progress;
    flight.latitude = position.lat;
    flight.longitude = position.lon;
    flight.altitude = oscillated_altitude(flight.base_altitude, amplitude_ft, progress);
    true
}

/// Step every flight and return how many moved.
pub fn step_flights(flights: &mut [Flight], delta: f64, amplitude_ft: f64) -> usize {
    flights
        .iter_mut()
        .map(|flight| step_flight(flight, delta, amplitude_ft))
        .filter(|moved| *moved)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::test_flight;
    use crate::models::GeoPoint;

    #[test]
    fn progress_wraps_modulo_one() {
        let next = advance_progress(0.99, 0.02);
        assert!((next - 0.01).abs() < 1e-9, "got {next}");
        assert_eq!(advance_progress(0.5, 0.5), 0.0);
        assert!((advance_progress(0.1, -0.2) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn altitude_oscillation_does_not_drift() {
        let mut flight = test_flight("A", 420.0, 30_000.0);
        for _ in 0..500 {
            step_flight(&mut flight, 0.02, 200.0);
            assert!((flight.altitude - 30_000.0).abs() <= 200.0 + 1e-9);
        }
        // 500 * 0.02 is a whole number of laps
        assert!(flight.progress.abs() < 1e-6 || (1.0 - flight.progress) < 1e-6);
        assert!((flight.altitude - 30_000.0).abs() < 1e-3);
    }

    #[test]
    fn frozen_flight_keeps_moving_without_touching_route_or_risk() {
        let mut flight = test_flight("B", 420.0, 30_000.0);
        flight.frozen = true;
        flight.risk_score = 0.3;
        let before = flight.position();

        assert!(step_flight(&mut flight, 0.1, 200.0));
        assert_ne!(flight.position(), before);
        assert_eq!(flight.risk_score, 0.3);
        assert_eq!(flight.route.as_deref(), Some("KLAX DCT KSFO"));
    }

    #[test]
    fn flights_without_a_path_pass_through() {
        let mut flight = test_flight("C", 420.0, 30_000.0);
        flight.path = vec![GeoPoint::new(1.0, 2.0)];
        flight.progress = 0.4;
        let snapshot = flight.clone();

        let mut flights = vec![flight];
        assert_eq!(step_flights(&mut flights, 0.02, 200.0), 0);
        assert_eq!(flights[0].progress, snapshot.progress);
        assert_eq!(flights[0].latitude, snapshot.latitude);
        assert_eq!(flights[0].altitude, snapshot.altitude);
    }
}
