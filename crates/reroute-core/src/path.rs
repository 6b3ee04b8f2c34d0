//! Path generation and interpolation.
//!
//! Paths are short polylines in raw lat/lon degrees. Interpolation is
//! uniform per segment: each of the `len - 1` segments gets an equal share
//! of the progress range regardless of its geographic length. Every caller
//! in the engine goes through [`position_at`] so animation speed stays
//! consistent between generated and rerouted paths.

use rand::Rng;

use crate::airports::Airport;
use crate::models::GeoPoint;

/// Maximum midpoint jitter for generated paths, degrees per axis.
pub const MIDPOINT_JITTER_DEG: f64 = 0.8;
/// Midpoint displacement per unit of bend factor, degrees.
pub const BEND_SCALE_DEG: f64 = 1.2;

/// Build the initial three-point path with a randomly perturbed midpoint.
pub fn generate_initial_path<R: Rng>(
    origin: &Airport,
    destination: &Airport,
    rng: &mut R,
) -> Vec<GeoPoint> {
    let mid = midpoint(origin, destination);
    let jitter_lat = rng.random_range(-1.0_f64..=1.0) * MIDPOINT_JITTER_DEG;
    let jitter_lon = rng.random_range(-1.0_f64..=1.0) * MIDPOINT_JITTER_DEG;

    vec![
        origin.point(),
        GeoPoint::new(mid.lat + jitter_lat, mid.lon + jitter_lon),
        destination.point(),
    ]
}

/// Build the post-approval path with a deterministic lateral bend.
///
/// Latitude and longitude are displaced in opposite directions so a
/// positive bend visibly pushes the route off its original line.
pub fn build_rerouted_path(origin: &Airport, destination: &Airport, bend_factor: f64) -> Vec<GeoPoint> {
    let mid = midpoint(origin, destination);

    vec![
        origin.point(),
        GeoPoint::new(
            mid.lat + bend_factor * BEND_SCALE_DEG,
            mid.lon - bend_factor * BEND_SCALE_DEG,
        ),
        destination.point(),
    ]
}

fn midpoint(a: &Airport, b: &Airport) -> GeoPoint {
    GeoPoint::new((a.lat + b.lat) / 2.0, (a.lon + b.lon) / 2.0)
}

/// Sum of Euclidean segment lengths in degrees.
pub fn path_length(path: &[GeoPoint]) -> f64 {
    path.windows(2)
        .map(|w| (w[1].lat - w[0].lat).hypot(w[1].lon - w[0].lon))
        .sum()
}

/// Position at normalized progress `t` along `path`.
///
/// `t` is clamped to `[0, 1]`. Returns `None` only for an empty path; a
/// single point or a zero-length path yields its first point.
pub fn position_at(path: &[GeoPoint], t: f64) -> Option<GeoPoint> {
    let first = *path.first()?;
    if path.len() < 2 || path_length(path) == 0.0 {
        return Some(first);
    }

    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let seg_count = path.len() - 1;
    let seg_float = t * seg_count as f64;
    let seg_index = (seg_float.floor() as usize).min(seg_count - 1);
    let seg_t = seg_float - seg_index as f64;

    let p1 = path[seg_index];
    let p2 = path[seg_index + 1];

    Some(GeoPoint::new(
        lerp(p1.lat, p2.lat, seg_t),
        lerp(p1.lon, p2.lon, seg_t),
    ))
}

/// Progress of the point on `path` closest to `point`, in the same
/// uniform-per-segment parameterization as [`position_at`].
///
/// Degenerate paths and non-finite points give 0.
pub fn nearest_progress(path: &[GeoPoint], point: GeoPoint) -> f64 {
    if path.len() < 2 {
        return 0.0;
    }
    let seg_count = (path.len() - 1) as f64;
    let mut best_dist = f64::INFINITY;
    let mut best_t = 0.0;

    for (i, seg) in path.windows(2).enumerate() {
        let (a, b) = (seg[0], seg[1]);
        let (d_lat, d_lon) = (b.lat - a.lat, b.lon - a.lon);
        let len_sq = d_lat * d_lat + d_lon * d_lon;
        let u = if len_sq > 0.0 {
            (((point.lat - a.lat) * d_lat + (point.lon - a.lon) * d_lon) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let dist = (point.lat - lerp(a.lat, b.lat, u)).hypot(point.lon - lerp(a.lon, b.lon, u));
        if dist < best_dist {
            best_dist = dist;
            best_t = (i as f64 + u) / seg_count;
        }
    }
    best_t
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
