use std::io::Write;

use abstutil::prettyprint_usize;
use anyhow::Result;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use serde_json::{json, Map};

use model::bikeshare::Dataset;
use model::{Marker, Renderer, TimeLabel};

/// Writes every frame as a GeoJSON FeatureCollection: one point per station, then any bike lane
/// overlays.
pub struct GeoJsonRenderer {
    // Station coordinates, in the same order as markers
    positions: Vec<(f64, f64)>,
    lanes: Vec<Feature>,
    output: Option<String>,
}

impl GeoJsonRenderer {
    pub fn new(dataset: &Dataset, lanes: Vec<Feature>, output: Option<String>) -> Self {
        Self {
            positions: dataset
                .stations
                .iter()
                .map(|s| (s.pos.x(), s.pos.y()))
                .collect(),
            lanes,
            output,
        }
    }

    pub fn to_geojson(&self, markers: &[Marker], label: &TimeLabel) -> GeoJson {
        let mut features = Vec::new();
        for (marker, (lon, lat)) in markers.iter().zip(self.positions.iter()) {
            let mut props = Map::new();
            props.insert("short_name".to_string(), json!(marker.code.as_str()));
            if let Some(ref name) = marker.name {
                props.insert("name".to_string(), json!(name));
            }
            props.insert("cx".to_string(), json!(marker.pos.x()));
            props.insert("cy".to_string(), json!(marker.pos.y()));
            props.insert("r".to_string(), json!(marker.radius));
            props.insert(
                "departure_ratio".to_string(),
                json!(marker.departure_ratio),
            );
            props.insert("flow".to_string(), json!(marker.flow));
            props.insert("arrivals".to_string(), json!(marker.traffic.arrivals()));
            props.insert("departures".to_string(), json!(marker.traffic.departures()));
            props.insert(
                "total_traffic".to_string(),
                json!(marker.traffic.total_traffic()),
            );
            props.insert("title".to_string(), json!(marker.tooltip));
            props.insert("marker-color".to_string(), json!(flow_color(marker.flow)));
            props.insert("stroke".to_string(), json!("white"));
            props.insert("stroke-width".to_string(), json!(1));

            features.push(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![*lon, *lat]))),
                id: Some(geojson::feature::Id::String(marker.code.to_string())),
                properties: Some(props),
                foreign_members: None,
            });
        }
        features.extend(self.lanes.iter().cloned());

        let mut foreign_members = Map::new();
        foreign_members.insert("time".to_string(), json!(label.to_string()));
        GeoJson::FeatureCollection(FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        })
    }
}

impl Renderer for GeoJsonRenderer {
    fn redraw(&mut self, markers: &[Marker], label: &TimeLabel) -> Result<()> {
        let gj = self.to_geojson(markers, label);
        let out = serde_json::to_string_pretty(&gj)?;
        match self.output {
            // Each frame replaces the last
            Some(ref path) => {
                fs_err::write(path, out)?;
                info!("Wrote {} markers for {label} to {path}", markers.len());
            }
            None => println!("{out}"),
        }
        Ok(())
    }
}

/// Blue for mostly departures, red for mostly arrivals
pub fn flow_color(flow: f64) -> String {
    let color = colorous::RED_BLUE.eval_continuous(flow.clamp(0.0, 1.0));
    format!("#{:x}", color)
}

/// A plain-text summary of the busiest stations
pub struct TextRenderer<W: Write> {
    out: W,
    top_n: usize,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, top_n: usize) -> Self {
        Self { out, top_n }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn redraw(&mut self, markers: &[Marker], label: &TimeLabel) -> Result<()> {
        let total: usize = markers.iter().map(|m| m.traffic.departures()).sum();
        writeln!(
            self.out,
            "{label}: {} departures across {} stations",
            prettyprint_usize(total),
            prettyprint_usize(markers.len())
        )?;

        let mut busiest: Vec<&Marker> = markers.iter().collect();
        busiest.sort_by_key(|m| std::cmp::Reverse(m.traffic.total_traffic()));
        for m in busiest.into_iter().take(self.top_n) {
            writeln!(
                self.out,
                "  {:<10} r={:>5.1} flow={:<3} {}",
                m.code.as_str(),
                m.radius,
                m.flow,
                m.tooltip
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}
