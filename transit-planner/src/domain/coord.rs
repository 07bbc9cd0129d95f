//! Geographic coordinates and the distance helpers used for edge weights.

use geo::{EuclideanDistance, HaversineDistance, Point};
use serde::{Deserialize, Serialize};

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Converts to a `geo` point (x = longitude, y = latitude).
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    /// Great-circle distance in meters.
    pub fn haversine_meters(&self, other: &Coordinate) -> f64 {
        self.to_point().haversine_distance(&other.to_point())
    }

    /// Planar distance in degrees, used for nearest-point lookups on shapes.
    pub fn planar_distance(&self, other: &Coordinate) -> f64 {
        self.to_point().euclidean_distance(&other.to_point())
    }

    /// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(&self, other: &Coordinate, t: f64) -> Coordinate {
        Coordinate {
            lat: self.lat + (other.lat - self.lat) * t,
            lon: self.lon + (other.lon - self.lon) * t,
        }
    }
}

/// Minutes needed to cover `meters` at `speed_kmh`.
pub fn travel_minutes(meters: f64, speed_kmh: f64) -> f64 {
    meters / (speed_kmh * 1000.0 / 60.0)
}

/// Straight line from `from` to `to` with exactly `points` evenly spaced
/// coordinates (endpoints included).
pub fn interpolate_line(from: Coordinate, to: Coordinate, points: usize) -> Vec<Coordinate> {
    match points {
        0 => Vec::new(),
        1 => vec![from],
        n => (0..n)
            .map(|i| from.lerp(&to, i as f64 / (n - 1) as f64))
            .collect(),
    }
}

/// Densifies a polyline to exactly `target` points.
///
/// The `target - 1` subdivisions are spread over the gaps as evenly as
/// possible, earlier gaps taking the remainder. Input vertices are kept and
/// the result runs in the same direction. Polylines that already have
/// `target` points or fewer than two are returned unchanged.
pub fn densify(points: &[Coordinate], target: usize) -> Vec<Coordinate> {
    if points.len() < 2 || points.len() >= target {
        return points.to_vec();
    }

    let gaps = points.len() - 1;
    let total = target - 1;
    let (base, extra) = (total / gaps, total % gaps);

    let mut out = Vec::with_capacity(target);
    for (gap, pair) in points.windows(2).enumerate() {
        let steps = base + usize::from(gap < extra);
        for i in 0..steps {
            out.push(pair[0].lerp(&pair[1], i as f64 / steps as f64));
        }
    }
    out.extend(points.last().copied());
    out
}
