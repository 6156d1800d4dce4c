use anyhow::Result;
use geom::Pt2D;
use serde::{Deserialize, Serialize};

use bikeshare::{Dataset, Station, StationCode};

use crate::{
    compute_station_traffic, departure_ratio, filter_trips, labels, MapView, Projection,
    ProjectionKind, QuantizeScale, RadiusScale, StationTraffic, TimeFilter, TimeLabel,
};

/// Everything needed to draw one station
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub code: StationCode,
    pub name: Option<String>,
    pub pos: Pt2D,
    pub radius: f64,
    /// Departures over total traffic, before bucketing
    pub departure_ratio: f64,
    /// One of the flow scale's buckets
    pub flow: f64,
    pub traffic: StationTraffic,
    pub tooltip: String,
}

/// Whatever actually draws the map
pub trait Renderer {
    fn redraw(&mut self, markers: &[Marker], label: &TimeLabel) -> Result<()>;
}

/// Owns the loaded data and the current filter. Every change recomputes everything from the full
/// trip list.
pub struct Dashboard {
    dataset: Dataset,
    view: MapView,
    projection: ProjectionKind,
    flow_scale: QuantizeScale,

    filter: TimeFilter,
    traffic: Vec<StationTraffic>,
    radius_scale: RadiusScale,
    matching_trips: usize,
}

impl Dashboard {
    pub fn new(dataset: Dataset, view: MapView) -> Self {
        let mut dashboard = Self {
            dataset,
            view,
            projection: ProjectionKind::WebMercator,
            flow_scale: QuantizeScale::flow(),

            filter: TimeFilter::Any,
            traffic: Vec::new(),
            radius_scale: RadiusScale::new(0),
            matching_trips: 0,
        };
        dashboard.recompute();
        dashboard
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn filter(&self) -> TimeFilter {
        self.filter
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn projection(&self) -> ProjectionKind {
        self.projection
    }

    /// The local plane needs stations that don't all share a longitude or latitude.
    pub fn set_projection(&mut self, projection: ProjectionKind) -> Result<()> {
        if projection == ProjectionKind::LocalPlane && !spans_an_area(&self.dataset.stations) {
            bail!("The stations don't cover an area, so they can't be placed on a local plane");
        }
        self.projection = projection;
        Ok(())
    }

    pub fn traffic(&self) -> &[StationTraffic] {
        &self.traffic
    }

    pub fn radius_scale(&self) -> RadiusScale {
        self.radius_scale
    }

    /// How many trips pass the current filter
    pub fn matching_trips(&self) -> usize {
        self.matching_trips
    }

    pub fn time_label(&self) -> TimeLabel {
        TimeLabel::new(self.filter)
    }

    pub fn set_filter(&mut self, filter: TimeFilter) {
        self.filter = filter;
        self.recompute();
    }

    /// The slider moved. Invalid values leave the current state alone.
    pub fn on_slider_change(&mut self, value: i32, renderer: &mut dyn Renderer) -> Result<()> {
        let filter = TimeFilter::from_slider(value)?;
        self.set_filter(filter);
        self.redraw(renderer)
    }

    /// The map moved, zoomed, or resized. Traffic doesn't change, only positions.
    pub fn on_view_change(&mut self, view: MapView, renderer: &mut dyn Renderer) -> Result<()> {
        self.view = view;
        self.redraw(renderer)
    }

    pub fn redraw(&self, renderer: &mut dyn Renderer) -> Result<()> {
        renderer.redraw(&self.markers(), &self.time_label())
    }

    pub fn markers(&self) -> Vec<Marker> {
        let projection: &dyn Projection = match self.projection {
            ProjectionKind::WebMercator => &self.view,
            ProjectionKind::LocalPlane => &self.dataset.gps_bounds,
        };
        self.dataset
            .stations
            .iter()
            .zip(self.traffic.iter())
            .map(|(station, traffic)| {
                let ratio = departure_ratio(traffic);
                Marker {
                    code: station.code.clone(),
                    name: station.name.clone(),
                    pos: projection.project(station.pos),
                    radius: self.radius_scale.radius(traffic.total_traffic()),
                    departure_ratio: ratio,
                    flow: self.flow_scale.bucket(ratio),
                    traffic: traffic.clone(),
                    tooltip: labels::tooltip(traffic),
                }
            })
            .collect()
    }

    fn recompute(&mut self) {
        let trips = filter_trips(&self.dataset.trips, self.filter);
        self.matching_trips = trips.len();
        self.traffic = compute_station_traffic(&self.dataset.stations, trips);
        self.radius_scale = RadiusScale::for_stations(&self.traffic);
        info!(
            "{} trips match {}, busiest station has {} trips",
            abstutil::prettyprint_usize(self.matching_trips),
            self.time_label(),
            abstutil::prettyprint_usize(crate::traffic::max_traffic(&self.traffic))
        );
    }
}

fn spans_an_area(stations: &[Station]) -> bool {
    let mut lon = (f64::MAX, f64::MIN);
    let mut lat = (f64::MAX, f64::MIN);
    for station in stations {
        lon = (lon.0.min(station.pos.x()), lon.1.max(station.pos.x()));
        lat = (lat.0.min(station.pos.y()), lat.1.max(station.pos.y()));
    }
    lon.0 < lon.1 && lat.0 < lat.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{station, trip};

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(Vec<Marker>, TimeLabel)>,
    }

    impl Renderer for Recorder {
        fn redraw(&mut self, markers: &[Marker], label: &TimeLabel) -> Result<()> {
            self.frames.push((markers.to_vec(), label.clone()));
            Ok(())
        }
    }

    fn dataset() -> Dataset {
        let mut dataset = Dataset::empty();
        dataset.stations = vec![station("A"), station("B"), station("C")];
        dataset.trips = vec![
            trip("A", "B", "2024-03-01 08:05:00", "2024-03-01 08:20:00"),
            trip("B", "C", "2024-03-01 17:30:00", "2024-03-01 17:45:00"),
            trip("C", "B", "2024-03-02 17:50:00", "2024-03-02 18:05:00"),
            trip("B", "A", "2024-03-02 18:10:00", "2024-03-02 18:30:00"),
        ];
        dataset
    }

    #[test]
    fn starts_unfiltered() {
        let dashboard = Dashboard::new(dataset(), MapView::default());
        assert_eq!(dashboard.filter(), TimeFilter::Any);
        assert_eq!(dashboard.matching_trips(), 4);
        let markers = dashboard.markers();
        assert_eq!(markers.len(), 3);
        // B has 2 arrivals and 2 departures
        assert_eq!(markers[1].traffic.total_traffic(), 4);
        assert_eq!(markers[1].radius, 25.0);
        assert_eq!(markers[1].flow, 0.5);
        assert_eq!(markers[1].tooltip, "4 trips (2 departures, 2 arrivals)");
        assert_eq!(markers[0].radius, 25.0 * 0.5_f64.sqrt());
    }

    #[test]
    fn slider_rescales() {
        let mut dashboard = Dashboard::new(dataset(), MapView::default());
        let mut recorder = Recorder::default();

        // 17:40
        dashboard.on_slider_change(1060, &mut recorder).unwrap();
        assert_eq!(dashboard.matching_trips(), 3);
        let (markers, label) = &recorder.frames[0];
        assert_eq!(label, &TimeLabel::At("5:40 PM".to_string()));
        // A: 1 arrival. B: 2 departures, 1 arrival. C: 1 departure, 1 arrival
        assert_eq!(markers[0].traffic.total_traffic(), 1);
        assert_eq!(markers[0].flow, 0.0);
        assert_eq!(markers[1].traffic.total_traffic(), 3);
        assert_eq!(markers[1].radius, 25.0);
        assert_eq!(markers[1].flow, 1.0);
        assert_eq!(dashboard.radius_scale().max_traffic(), 3);

        // Back to everything; nothing left over from the filtered pass
        dashboard.on_slider_change(-1, &mut recorder).unwrap();
        assert_eq!(recorder.frames[1].1, TimeLabel::AnyTime);
        assert_eq!(recorder.frames[1].0[1].traffic.total_traffic(), 4);
    }

    #[test]
    fn empty_window() {
        let mut dashboard = Dashboard::new(dataset(), MapView::default());
        let mut recorder = Recorder::default();
        dashboard.on_slider_change(180, &mut recorder).unwrap();
        assert_eq!(dashboard.matching_trips(), 0);
        assert_eq!(dashboard.radius_scale().max_traffic(), 1);
        for marker in &recorder.frames[0].0 {
            assert_eq!(marker.radius, 0.0);
            assert_eq!(marker.flow, 0.5);
        }
    }

    #[test]
    fn bad_slider_value_keeps_state() {
        let mut dashboard = Dashboard::new(dataset(), MapView::default());
        let mut recorder = Recorder::default();
        dashboard.on_slider_change(600, &mut recorder).unwrap();
        assert!(dashboard.on_slider_change(5000, &mut recorder).is_err());
        assert_eq!(dashboard.filter(), TimeFilter::Around(600));
        assert_eq!(recorder.frames.len(), 1);
    }

    #[test]
    fn view_change_only_moves() {
        let mut dashboard = Dashboard::new(dataset(), MapView::default());
        let mut recorder = Recorder::default();
        dashboard.redraw(&mut recorder).unwrap();

        let mut view = dashboard.view().clone();
        view.set_zoom(14.0).unwrap();
        dashboard.on_view_change(view, &mut recorder).unwrap();

        let (before, after) = (&recorder.frames[0].0, &recorder.frames[1].0);
        for (a, b) in before.iter().zip(after.iter()) {
            assert_eq!(a.radius, b.radius);
            assert_eq!(a.traffic, b.traffic);
        }
        assert_ne!(before[0].pos, after[0].pos);
    }

    #[test]
    fn local_plane_projection() {
        let mut ds = dataset();
        for (station, (lon, lat)) in ds
            .stations
            .iter_mut()
            .zip([(-71.12, 42.36), (-71.1, 42.37), (-71.08, 42.38)])
        {
            station.pos = geom::LonLat::new(lon, lat);
            ds.gps_bounds.update(station.pos);
        }
        let mut dashboard = Dashboard::new(ds, MapView::default());
        dashboard.set_projection(ProjectionKind::LocalPlane).unwrap();

        let markers = dashboard.markers();
        assert!(markers[0].pos.x().abs() < 0.01);
        assert!(markers[2].pos.y().abs() < 0.01);
        assert!(markers[1].pos.x() > markers[0].pos.x());
        assert!(markers[1].pos.y() < markers[0].pos.y());

        // Moving the map doesn't move anything on the local plane
        let mut recorder = Recorder::default();
        let mut view = dashboard.view().clone();
        view.set_zoom(15.0).unwrap();
        dashboard.on_view_change(view, &mut recorder).unwrap();
        assert_eq!(recorder.frames[0].0[1].pos, markers[1].pos);
    }

    #[test]
    fn local_plane_needs_an_area() {
        // The test stations all share a latitude
        let mut dashboard = Dashboard::new(dataset(), MapView::default());
        assert!(dashboard.set_projection(ProjectionKind::LocalPlane).is_err());
        assert_eq!(dashboard.projection(), ProjectionKind::WebMercator);

        let mut empty = Dashboard::new(Dataset::empty(), MapView::default());
        assert!(empty.set_projection(ProjectionKind::LocalPlane).is_err());
    }
}
