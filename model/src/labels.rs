use std::fmt;

use chrono::NaiveTime;

use crate::{StationTraffic, TimeFilter};

pub fn tooltip(traffic: &StationTraffic) -> String {
    format!(
        "{} trips ({} departures, {} arrivals)",
        traffic.total_traffic(),
        traffic.departures(),
        traffic.arrivals()
    )
}

/// Like "8:05 AM". Minutes past the end of the day wrap around.
pub fn format_time(minutes: u32) -> String {
    let minutes = minutes % (24 * 60);
    match NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0) {
        Some(t) => t.format("%-I:%M %p").to_string(),
        None => unreachable!("{minutes} minutes is always a valid time"),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeLabel {
    AnyTime,
    At(String),
}

impl TimeLabel {
    pub fn new(filter: TimeFilter) -> Self {
        match filter {
            TimeFilter::Any => TimeLabel::AnyTime,
            TimeFilter::Around(minute) => TimeLabel::At(format_time(minute)),
        }
    }
}

impl fmt::Display for TimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TimeLabel::AnyTime => write!(f, "(any time)"),
            TimeLabel::At(time) => write!(f, "{time}"),
        }
    }
}
