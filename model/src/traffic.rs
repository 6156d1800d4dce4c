use std::collections::BTreeSet;

use abstutil::Counter;
use serde::{Deserialize, Serialize};

use bikeshare::{Station, StationCode, Trip};

/// Derived per-station counts. Rebuilt from scratch for every filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationTraffic {
    pub code: StationCode,
    arrivals: usize,
    departures: usize,
    total_traffic: usize,
}

impl StationTraffic {
    pub fn new(code: StationCode, arrivals: usize, departures: usize) -> Self {
        Self {
            code,
            arrivals,
            departures,
            total_traffic: arrivals + departures,
        }
    }

    pub fn arrivals(&self) -> usize {
        self.arrivals
    }

    pub fn departures(&self) -> usize {
        self.departures
    }

    pub fn total_traffic(&self) -> usize {
        self.total_traffic
    }
}

/// One record per station, in the same order as `stations`. Trips touching unknown stations
/// don't count anywhere.
pub fn compute_station_traffic<'a, I: IntoIterator<Item = &'a Trip>>(
    stations: &[Station],
    trips: I,
) -> Vec<StationTraffic> {
    let mut departures: Counter<StationCode> = Counter::new();
    let mut arrivals: Counter<StationCode> = Counter::new();
    for trip in trips {
        departures.inc(trip.start_station.clone());
        arrivals.inc(trip.end_station.clone());
    }

    let known: BTreeSet<&StationCode> = stations.iter().map(|s| &s.code).collect();
    let unknown: BTreeSet<&StationCode> = departures
        .borrow()
        .keys()
        .chain(arrivals.borrow().keys())
        .filter(|code| !known.contains(code))
        .collect();
    if !unknown.is_empty() {
        debug!("Trips reference {} unknown stations: {:?}", unknown.len(), unknown);
    }

    stations
        .iter()
        .map(|station| {
            StationTraffic::new(
                station.code.clone(),
                arrivals.get(station.code.clone()),
                departures.get(station.code.clone()),
            )
        })
        .collect()
}

pub fn max_traffic(traffic: &[StationTraffic]) -> usize {
    traffic
        .iter()
        .map(|t| t.total_traffic())
        .max()
        .unwrap_or(0)
}
