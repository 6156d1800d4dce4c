#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod commands;
mod lanes;
mod render;

use std::io::BufRead;
use std::str::FromStr;

use abstutil::Timer;
use anyhow::Result;
use structopt::StructOpt;

use model::bikeshare::Dataset;
use model::{Dashboard, MapView, ProjectionKind, Renderer};

pub use self::commands::Command;
pub use self::render::{flow_color, GeoJsonRenderer, TextRenderer};

#[derive(StructOpt)]
pub struct Args {
    /// The path to a GBFS station_information JSON file
    #[structopt(long)]
    stations: Option<String>,
    /// The path to a CSV file of trips
    #[structopt(long)]
    trips: Option<String>,
    /// The path to a .zip file containing stations.json and trips.csv
    #[structopt(long)]
    import_zip: Option<String>,
    /// Only count trips within an hour of this many minutes past midnight. -1 means any time.
    #[structopt(long, default_value = "-1", allow_hyphen_values = true)]
    time: i32,
    /// Read slider values and view changes from stdin, one per line, redrawing after each
    #[structopt(long)]
    interactive: bool,
    /// Where to write GeoJSON. Defaults to stdout.
    #[structopt(long)]
    output: Option<String>,
    /// GeoJSON files of bike lanes to draw underneath the stations
    #[structopt(long)]
    bike_lanes: Vec<String>,
    /// geojson or text
    #[structopt(long, default_value = "geojson")]
    format: Format,
    /// mercator places stations in the map view; local uses meters across the stations' bounds
    #[structopt(long, default_value = "mercator")]
    projection: ProjectionKind,
    #[structopt(long)]
    width: Option<f64>,
    #[structopt(long)]
    height: Option<f64>,
    #[structopt(long)]
    zoom: Option<f64>,
    #[structopt(long, allow_hyphen_values = true)]
    center_lon: Option<f64>,
    #[structopt(long, allow_hyphen_values = true)]
    center_lat: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Format {
    GeoJson,
    Text,
}

impl FromStr for Format {
    type Err = anyhow::Error;

    fn from_str(x: &str) -> Result<Self> {
        match x {
            "geojson" => Ok(Format::GeoJson),
            "text" => Ok(Format::Text),
            _ => bail!("Unknown format {x}; use geojson or text"),
        }
    }
}

impl Args {
    fn load(&mut self, timer: &mut Timer) -> Result<Dataset> {
        if let Some(path) = self.import_zip.take() {
            if self.stations.is_some() || self.trips.is_some() {
                bail!("You can't specify both --import-zip and --stations/--trips");
            }
            let bytes = fs_err::read(path)?;
            return Dataset::import_zip_bytes(bytes, timer);
        }
        match (self.stations.take(), self.trips.take()) {
            (Some(stations), Some(trips)) => Dataset::load(
                fs_err::File::open(stations)?,
                fs_err::File::open(trips)?,
                timer,
            ),
            (None, None) => bail!("No input specified"),
            _ => bail!("Both --stations and --trips are needed"),
        }
    }

    fn map_view(&self) -> Result<MapView> {
        let mut view = MapView::default();
        let (width, height) = view.size();
        view.resize(self.width.unwrap_or(width), self.height.unwrap_or(height))?;
        if let Some(zoom) = self.zoom {
            view.set_zoom(zoom)?;
        }
        let (lon, lat) = view.center();
        view.pan_to(self.center_lon.unwrap_or(lon), self.center_lat.unwrap_or(lat))?;
        Ok(view)
    }

    fn renderer(&self, dataset: &Dataset) -> Result<Box<dyn Renderer>> {
        Ok(match self.format {
            Format::GeoJson => {
                let mut lanes = Vec::new();
                for path in &self.bike_lanes {
                    lanes.extend(lanes::load(path)?);
                }
                Box::new(GeoJsonRenderer::new(dataset, lanes, self.output.clone()))
            }
            Format::Text => {
                if !self.bike_lanes.is_empty() {
                    warn!("Bike lanes are only drawn with --format geojson");
                }
                Box::new(TextRenderer::new(std::io::stdout(), 10))
            }
        })
    }
}

pub fn run() -> Result<()> {
    abstutil::logger::setup();

    let mut args = Args::from_iter(abstutil::cli_args());
    let mut timer = Timer::new("load bikeshare data");
    let dataset = args.load(&mut timer)?;
    drop(timer);

    let view = args.map_view()?;
    let mut renderer = args.renderer(&dataset)?;
    let mut dashboard = Dashboard::new(dataset, view);
    dashboard.set_projection(args.projection)?;
    dashboard.on_slider_change(args.time, renderer.as_mut())?;

    if args.interactive {
        let stdin = std::io::stdin();
        interact(&mut dashboard, renderer.as_mut(), stdin.lock())?;
    }
    Ok(())
}

/// Handles commands until quit or EOF. A bad line is logged and skipped; it doesn't end the
/// session.
pub fn interact<R: BufRead>(
    dashboard: &mut Dashboard,
    renderer: &mut dyn Renderer,
    input: R,
) -> Result<()> {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                error!("Skipping unreadable input: {err}");
                continue;
            }
        };
        let cmd = match Command::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(err) => {
                error!("{err}");
                continue;
            }
        };
        if let Err(err) = handle(cmd, dashboard, renderer) {
            error!("{err}");
        }
    }
    Ok(())
}

fn handle(cmd: Command, dashboard: &mut Dashboard, renderer: &mut dyn Renderer) -> Result<()> {
    let mut view = dashboard.view().clone();
    match cmd {
        Command::Slider(value) => return dashboard.on_slider_change(value, renderer),
        Command::Zoom(zoom) => view.set_zoom(zoom)?,
        Command::Pan(lon, lat) => view.pan_to(lon, lat)?,
        Command::Resize(width, height) => view.resize(width, height)?,
        Command::Quit => return Ok(()),
    }
    dashboard.on_view_change(view, renderer)
}
