use anyhow::Result;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{RideID, StationCode};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Trip {
    pub ride_id: Option<RideID>,
    pub bike_type: Option<String>,
    pub is_member: Option<bool>,

    pub start_station: StationCode,
    pub end_station: StationCode,
    /// Local wall-clock time; the timezone of the feed is not tracked
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
}

pub fn load<R: std::io::Read>(reader: R) -> Result<Vec<Trip>> {
    let mut trips = Vec::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: Record = rec?;
        trips.push(Trip {
            started_at: parse_timestamp(&rec.started_at)?,
            ended_at: parse_timestamp(&rec.ended_at)?,
            ride_id: rec.ride_id,
            bike_type: rec.bike_type.filter(|x| !x.is_empty()),
            is_member: match rec.is_member.as_deref() {
                None | Some("") => None,
                Some("1") | Some("true") | Some("member") => Some(true),
                Some("0") | Some("false") | Some("casual") => Some(false),
                Some(x) => bail!("Unknown is_member value {x:?}"),
            },
            start_station: rec.start_station_id,
            end_station: rec.end_station_id,
        });
    }
    Ok(trips)
}

/// Accepts the formats seen in trip exports. Offsets are dropped, keeping the local time.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(x) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(x);
        }
    }
    if let Ok(x) = DateTime::parse_from_rfc3339(raw) {
        return Ok(x.naive_local());
    }
    bail!("Can't parse timestamp {raw:?}")
}

#[derive(Deserialize)]
struct Record {
    ride_id: Option<RideID>,
    #[serde(alias = "rideable_type")]
    bike_type: Option<String>,
    is_member: Option<String>,
    started_at: String,
    ended_at: String,
    start_station_id: StationCode,
    end_station_id: StationCode,
}
