use serde::{Deserialize, Serialize};

use crate::StationTraffic;

/// Circles are at most this big, in pixels
pub const MAX_RADIUS: f64 = 25.0;

/// Maps traffic onto a circle radius so that circle area is proportional to traffic.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadiusScale {
    max_traffic: usize,
    max_radius: f64,
}

impl RadiusScale {
    /// A max of 0 would collapse the domain, so it becomes 1.
    pub fn new(max_traffic: usize) -> Self {
        Self {
            max_traffic: max_traffic.max(1),
            max_radius: MAX_RADIUS,
        }
    }

    pub fn for_stations(traffic: &[StationTraffic]) -> Self {
        Self::new(crate::traffic::max_traffic(traffic))
    }

    pub fn max_traffic(&self) -> usize {
        self.max_traffic
    }

    /// Not clamped; traffic above the domain max gets a bigger circle.
    pub fn radius(&self, traffic: usize) -> f64 {
        self.max_radius * (traffic as f64 / self.max_traffic as f64).sqrt()
    }
}

/// Departures over total traffic. Stations with no traffic are treated as balanced.
pub fn departure_ratio(traffic: &StationTraffic) -> f64 {
    if traffic.total_traffic() == 0 {
        return 0.5;
    }
    traffic.departures() as f64 / traffic.total_traffic() as f64
}

/// Splits a continuous domain into equal-width buckets, each mapped to one output value.
///
/// A value sitting exactly on a bucket boundary belongs to the upper bucket. Values outside the
/// domain go to the first or last bucket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuantizeScale {
    min: f64,
    max: f64,
    buckets: Vec<f64>,
}

impl QuantizeScale {
    // Needs at least one bucket and min < max
    fn new(min: f64, max: f64, buckets: Vec<f64>) -> Self {
        Self { min, max, buckets }
    }

    /// The departure ratio styling: mostly arrivals, balanced, mostly departures
    pub fn flow() -> Self {
        Self::new(0.0, 1.0, vec![0.0, 0.5, 1.0])
    }

    pub fn thresholds(&self) -> Vec<f64> {
        let n = self.buckets.len();
        (1..n)
            .map(|i| self.min + (self.max - self.min) * (i as f64) / (n as f64))
            .collect()
    }

    pub fn bucket(&self, x: f64) -> f64 {
        let idx = self.thresholds().into_iter().filter(|t| x >= *t).count();
        self.buckets[idx]
    }
}
