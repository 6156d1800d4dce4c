use std::f64::consts::PI;
use std::str::FromStr;

use anyhow::Result;
use geom::{GPSBounds, LonLat, Pt2D};
use serde::{Deserialize, Serialize};

/// Turns a coordinate into a screen position. Only valid until the view changes.
pub trait Projection {
    fn project(&self, pos: LonLat) -> Pt2D;
}

/// Local plane in meters, relative to the dataset's bounds
impl Projection for GPSBounds {
    fn project(&self, pos: LonLat) -> Pt2D {
        pos.to_pt(self)
    }
}

/// Which projection markers are placed with
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ProjectionKind {
    /// Pixels in the current `MapView`
    WebMercator,
    /// Meters across the dataset's bounds. Pan and zoom don't affect it.
    LocalPlane,
}

impl FromStr for ProjectionKind {
    type Err = anyhow::Error;

    fn from_str(x: &str) -> Result<Self> {
        match x {
            "mercator" => Ok(ProjectionKind::WebMercator),
            "local" => Ok(ProjectionKind::LocalPlane),
            _ => bail!("Unknown projection {x}; use mercator or local"),
        }
    }
}

const TILE_SIZE: f64 = 512.0;
const MAX_LATITUDE: f64 = 85.051129;

/// A Web Mercator viewport, like a slippy map shows. Pixel (0, 0) is the top-left corner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    center_lon: f64,
    center_lat: f64,
    zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    width: f64,
    height: f64,
}

impl Default for MapView {
    /// Cambridge, MA
    fn default() -> Self {
        Self {
            center_lon: -71.1056,
            center_lat: 42.3751,
            zoom: 12.0,
            min_zoom: 5.0,
            max_zoom: 18.0,
            width: 1024.0,
            height: 768.0,
        }
    }
}

impl MapView {
    pub fn center(&self) -> (f64, f64) {
        (self.center_lon, self.center_lat)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn pan_to(&mut self, lon: f64, lat: f64) -> Result<()> {
        if !lon.is_finite() || !lat.is_finite() {
            bail!("Can't pan to {lon}, {lat}");
        }
        self.center_lon = lon.clamp(-180.0, 180.0);
        self.center_lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        Ok(())
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<()> {
        if !zoom.is_finite() {
            bail!("Bad zoom {zoom}");
        }
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        Ok(())
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        if !width.is_finite() || !height.is_finite() {
            bail!("Bad size {width}x{height}");
        }
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        Ok(())
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * 2.0_f64.powf(self.zoom)
    }

    // Position in the whole world at this zoom
    fn to_world(&self, lon: f64, lat: f64) -> (f64, f64) {
        let size = self.world_size();
        let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (lon + 180.0) / 360.0 * size;
        let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0 * size;
        (x, y)
    }
}

impl Projection for MapView {
    fn project(&self, pos: LonLat) -> Pt2D {
        let (x, y) = self.to_world(pos.x(), pos.y());
        let (cx, cy) = self.to_world(self.center_lon, self.center_lat);
        Pt2D::new(x - cx + self.width / 2.0, y - cy + self.height / 2.0)
    }
}
