use std::collections::BTreeSet;

use anyhow::Result;
use geom::{GPSBounds, LonLat};
use serde::{Deserialize, Deserializer, Serialize};

use crate::StationCode;

#[derive(Clone, Serialize, Deserialize)]
pub struct Station {
    pub code: StationCode,
    pub pos: LonLat,
    pub name: Option<String>,
    pub capacity: Option<usize>,
}

/// Reads a GBFS-style `station_information` document. Stations keep the order of the file.
pub fn load<R: std::io::Read>(reader: R) -> Result<(Vec<Station>, GPSBounds)> {
    let doc: Document = serde_json::from_reader(reader)?;

    let mut gps_bounds = GPSBounds::new();
    let mut seen = BTreeSet::new();
    let mut stations = Vec::new();
    for rec in doc.data.stations {
        if !seen.insert(rec.short_name.clone()) {
            bail!("Duplicate {:?}", rec.short_name);
        }
        if !(-180.0..=180.0).contains(&rec.lon) || !(-90.0..=90.0).contains(&rec.lat) {
            bail!("{:?} has a bad position: {}, {}", rec.short_name, rec.lon, rec.lat);
        }
        let pos = LonLat::new(rec.lon, rec.lat);
        gps_bounds.update(pos);
        stations.push(Station {
            code: rec.short_name,
            pos,
            name: rec.name,
            capacity: rec.capacity,
        });
    }
    Ok((stations, gps_bounds))
}

#[derive(Deserialize)]
struct Document {
    data: Data,
}

#[derive(Deserialize)]
struct Data {
    stations: Vec<Record>,
}

#[derive(Deserialize)]
struct Record {
    short_name: StationCode,
    #[serde(deserialize_with = "parse_coord")]
    lon: f64,
    #[serde(deserialize_with = "parse_coord")]
    lat: f64,
    name: Option<String>,
    capacity: Option<usize>,
    // station_id and region_id are unused; trips only refer to short_name
}

// Some feeds quote the coordinates
fn parse_coord<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(d)? {
        Raw::Number(x) => Ok(x),
        Raw::Text(x) => x
            .trim()
            .parse::<f64>()
            .map_err(|err| serde::de::Error::custom(format!("Bad coordinate {x:?}: {err}"))),
    }
}
