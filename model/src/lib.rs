#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod dashboard;
mod filter;
pub mod labels;
mod scale;
mod traffic;
mod view;

pub use self::dashboard::{Dashboard, Marker, Renderer};
pub use self::filter::{
    filter_trips, minutes_since_midnight, TimeFilter, LAST_MINUTE_OF_DAY, TOLERANCE_MINUTES,
};
pub use self::labels::{format_time, tooltip, TimeLabel};
pub use self::scale::{departure_ratio, QuantizeScale, RadiusScale, MAX_RADIUS};
pub use self::traffic::{compute_station_traffic, max_traffic, StationTraffic};
pub use self::view::{MapView, Projection, ProjectionKind};

pub use bikeshare;
