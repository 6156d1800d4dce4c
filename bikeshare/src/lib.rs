#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod ids;
mod stations;
mod trips;

use std::collections::BTreeSet;

use abstutil::{prettyprint_usize, Timer};
use anyhow::Result;
use geom::GPSBounds;
use serde::{Deserialize, Serialize};
use zip::ZipArchive;

pub use ids::{RideID, StationCode};
pub use stations::Station;
pub use trips::{parse_timestamp, Trip};

/// Everything loaded once at startup. Nothing here changes afterwards.
#[derive(Clone, Serialize, Deserialize)]
pub struct Dataset {
    // In the order of the input file
    pub stations: Vec<Station>,
    pub trips: Vec<Trip>,
    pub gps_bounds: GPSBounds,
}

impl Dataset {
    pub fn load<R1: std::io::Read, R2: std::io::Read>(
        stations_reader: R1,
        trips_reader: R2,
        timer: &mut Timer,
    ) -> Result<Self> {
        timer.start("load stations");
        let (stations, gps_bounds) = stations::load(stations_reader)?;
        timer.stop("load stations");

        timer.start("load trips");
        let trips = trips::load(trips_reader)?;
        timer.stop("load trips");

        let dataset = Self {
            stations,
            trips,
            gps_bounds,
        };
        dataset.describe();
        Ok(dataset)
    }

    /// Expects `stations.json` and `trips.csv` at the root of the archive
    pub fn import_zip_bytes(bytes: Vec<u8>, timer: &mut Timer) -> Result<Self> {
        let mut archive = ZipArchive::new(std::io::Cursor::new(bytes))?;

        timer.start("load stations");
        let (stations, gps_bounds) = stations::load(get_zip_file(&mut archive, "stations.json")?)?;
        timer.stop("load stations");

        timer.start("load trips");
        let trips = trips::load(get_zip_file(&mut archive, "trips.csv")?)?;
        timer.stop("load trips");

        let dataset = Self {
            stations,
            trips,
            gps_bounds,
        };
        dataset.describe();
        Ok(dataset)
    }

    pub fn empty() -> Self {
        Self {
            stations: Vec::new(),
            trips: Vec::new(),
            gps_bounds: GPSBounds::new(),
        }
    }

    fn describe(&self) {
        info!(
            "Loaded {} stations and {} trips",
            prettyprint_usize(self.stations.len()),
            prettyprint_usize(self.trips.len())
        );

        let mut used = BTreeSet::new();
        for trip in &self.trips {
            used.insert(&trip.start_station);
            used.insert(&trip.end_station);
        }
        let idle: Vec<&StationCode> = self
            .stations
            .iter()
            .map(|s| &s.code)
            .filter(|code| !used.contains(code))
            .collect();
        if !idle.is_empty() {
            warn!(
                "{} stations have no trips at all: {:?}",
                prettyprint_usize(idle.len()),
                idle
            );
        }
    }
}

// Adds the path in the error message
fn get_zip_file<'a, R: std::io::Read + std::io::Seek>(
    archive: &'a mut ZipArchive<R>,
    path: &str,
) -> Result<zip::read::ZipFile<'a>> {
    archive
        .by_name(path)
        .map_err(|err| anyhow!("{path}: {err}"))
}
