use anyhow::Result;
use geojson::{Feature, GeoJson};
use serde_json::{json, Map, Value};

/// Bright green, fairly thick, a little transparent
const STROKE: &str = "#32D400";
const STROKE_WIDTH: f64 = 5.0;
const STROKE_OPACITY: f64 = 0.6;

/// Reads a GeoJSON file of bike lanes and styles every feature as a lane. The layer name is the
/// file stem.
pub fn load(path: &str) -> Result<Vec<Feature>> {
    let raw = fs_err::read_to_string(path)?;
    let layer = std::path::Path::new(path)
        .file_stem()
        .map(|x| x.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string());
    let features = parse(&raw, &layer).map_err(|err| anyhow!("{path}: {err}"))?;
    info!("{} bike lane features from {path}", features.len());
    Ok(features)
}

pub fn parse(raw: &str, layer: &str) -> Result<Vec<Feature>> {
    let mut features = match raw.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(geometry) => vec![Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    };
    for f in &mut features {
        let props = f.properties.get_or_insert_with(Map::new);
        props.insert("layer".to_string(), Value::String(layer.to_string()));
        props.insert("stroke".to_string(), json!(STROKE));
        props.insert("stroke-width".to_string(), json!(STROKE_WIDTH));
        props.insert("stroke-opacity".to_string(), json!(STROKE_OPACITY));
    }
    Ok(features)
}
