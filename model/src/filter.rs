use anyhow::Result;
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use bikeshare::Trip;

/// A trip counts if it starts or ends within this many minutes of the cutoff.
pub const TOLERANCE_MINUTES: u32 = 60;

pub const LAST_MINUTE_OF_DAY: u32 = 24 * 60 - 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFilter {
    Any,
    /// Minutes since midnight, at most `LAST_MINUTE_OF_DAY`
    Around(u32),
}

impl TimeFilter {
    /// The slider uses -1 for "any time"
    pub fn from_slider(value: i32) -> Result<Self> {
        if value == -1 {
            return Ok(TimeFilter::Any);
        }
        if value < 0 || value as u32 > LAST_MINUTE_OF_DAY {
            bail!("Slider value {value} is outside [-1, {LAST_MINUTE_OF_DAY}]");
        }
        Ok(TimeFilter::Around(value as u32))
    }

    pub fn matches(self, trip: &Trip) -> bool {
        match self {
            TimeFilter::Any => true,
            TimeFilter::Around(cutoff) => {
                // No wraparound at midnight
                let near = |t: &NaiveDateTime| {
                    minutes_since_midnight(t).abs_diff(cutoff) <= TOLERANCE_MINUTES
                };
                near(&trip.started_at) || near(&trip.ended_at)
            }
        }
    }
}

/// Ignores the date and seconds
pub fn minutes_since_midnight(t: &NaiveDateTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Order is preserved. With `TimeFilter::Any`, every trip is returned.
pub fn filter_trips(trips: &[Trip], filter: TimeFilter) -> Vec<&Trip> {
    match filter {
        TimeFilter::Any => trips.iter().collect(),
        TimeFilter::Around(_) => trips.iter().filter(|trip| filter.matches(trip)).collect(),
    }
}
