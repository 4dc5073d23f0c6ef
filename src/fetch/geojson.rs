use std::sync::LazyLock;

use geo::Coord;
use regex::Regex;
use serde_json::Value;

use super::{DataLocation, FeatureSource};
use crate::error::FuseError;
use crate::types::PolygonFeature;

/// Known suffix variants appended to feature names by the capture tooling.
/// Anything beyond these two is left untouched so an unexpected variant
/// fails the join visibly instead of partially matching.
static NAME_SUFFIXES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("_auto|_merged").expect("valid suffix pattern"));

/// Strip capture-tool suffixes from a feature name before joining against
/// the survey key column.
pub fn normalize_name(name: &str) -> String {
    NAME_SUFFIXES.replace_all(name, "").into_owned()
}

/// Fetches and parses the behavioral polygon feature collection.
#[derive(Debug, Clone)]
pub struct GeoJsonSource {
    location: DataLocation,
}

impl GeoJsonSource {
    pub fn new(location: DataLocation) -> Self {
        Self { location }
    }
}

impl FeatureSource for GeoJsonSource {
    fn fetch(&self) -> Result<Vec<PolygonFeature>, FuseError> {
        let bytes = self.location.read_bytes()?;
        parse_feature_collection(&bytes)
    }
}

/// Parse GeoJSON bytes into polygon features with normalized names.
pub fn parse_feature_collection(bytes: &[u8]) -> Result<Vec<PolygonFeature>, FuseError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| FuseError::FetchFailed(format!("parse geojson: {e}")))?;
    let features = value["features"]
        .as_array()
        .ok_or_else(|| FuseError::FetchFailed("geojson has no features array".to_string()))?;
    features.iter().map(parse_feature).collect()
}

fn parse_feature(feature: &Value) -> Result<PolygonFeature, FuseError> {
    let name = feature["properties"]["Name"]
        .as_str()
        .ok_or_else(|| FuseError::FetchFailed("feature missing properties.Name".to_string()))?;

    let geometry = &feature["geometry"];
    let geometry_type = geometry["type"].as_str().unwrap_or("<none>");
    if geometry_type != "MultiPolygon" {
        return Err(FuseError::UnsupportedGeometry(format!(
            "expected MultiPolygon, got {geometry_type}"
        )));
    }

    // Only the outer ring of the first polygon is consumed; a MultiPolygon
    // without one is unsupported rather than silently skipped.
    let ring = geometry["coordinates"]
        .get(0)
        .and_then(|polygon| polygon.get(0))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            FuseError::UnsupportedGeometry("MultiPolygon missing first outer ring".to_string())
        })?;

    let coords = ring.iter().map(parse_vertex).collect::<Result<Vec<_>, _>>()?;
    Ok(PolygonFeature { name: normalize_name(name), coords })
}

/// A vertex is a `[lon, lat]` pair whose components may be JSON numbers or
/// numeric strings (the capture export mixes both).
fn parse_vertex(vertex: &Value) -> Result<Coord<f64>, FuseError> {
    let pair = vertex
        .as_array()
        .filter(|pair| pair.len() >= 2)
        .ok_or_else(|| FuseError::InvalidCoordinate(vertex.to_string()))?;
    Ok(Coord { x: parse_component(&pair[0])?, y: parse_component(&pair[1])? })
}

fn parse_component(value: &Value) -> Result<f64, FuseError> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|component| component.is_finite())
        .ok_or_else(|| FuseError::InvalidCoordinate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(features: &str) -> String {
        format!(r#"{{"type": "FeatureCollection", "features": [{features}]}}"#)
    }

    fn multipolygon_feature(name: &str, ring: &str) -> String {
        format!(
            r#"{{
                "type": "Feature",
                "properties": {{"Name": "{name}"}},
                "geometry": {{"type": "MultiPolygon", "coordinates": [[{ring}]]}}
            }}"#
        )
    }

    #[test]
    fn parses_outer_ring_of_first_polygon() {
        let json = collection(&multipolygon_feature(
            "A1",
            "[[-73.86, 40.83], [-73.85, 40.84], [-73.86, 40.84]]",
        ));
        let features = parse_feature_collection(json.as_bytes()).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "A1");
        assert_eq!(features[0].coords[1], Coord { x: -73.85, y: 40.84 });
    }

    #[test]
    fn name_suffixes_are_stripped() {
        assert_eq!(normalize_name("A1_auto"), "A1");
        assert_eq!(normalize_name("B2_merged"), "B2");
        assert_eq!(normalize_name("C3_auto_merged"), "C3");
        assert_eq!(normalize_name("D4"), "D4");
        // Unknown suffixes are left alone so the join fails visibly.
        assert_eq!(normalize_name("E5_manual"), "E5_manual");
    }

    #[test]
    fn string_components_are_parsed() {
        let json = collection(&multipolygon_feature("A1", r#"[["-73.86", "40.83"]]"#));
        let features = parse_feature_collection(json.as_bytes()).unwrap();
        assert_eq!(features[0].coords[0], Coord { x: -73.86, y: 40.83 });
    }

    #[test]
    fn unparseable_component_is_invalid_coordinate() {
        let json = collection(&multipolygon_feature("A1", r#"[["not-a-number", 40.83]]"#));
        assert!(matches!(
            parse_feature_collection(json.as_bytes()),
            Err(FuseError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn non_multipolygon_geometry_is_unsupported() {
        let json = collection(
            r#"{
                "type": "Feature",
                "properties": {"Name": "A1"},
                "geometry": {"type": "Point", "coordinates": [-73.86, 40.83]}
            }"#,
        );
        assert!(matches!(
            parse_feature_collection(json.as_bytes()),
            Err(FuseError::UnsupportedGeometry(_))
        ));
    }

    #[test]
    fn multipolygon_without_rings_is_unsupported() {
        let json = collection(
            r#"{
                "type": "Feature",
                "properties": {"Name": "A1"},
                "geometry": {"type": "MultiPolygon", "coordinates": []}
            }"#,
        );
        assert!(matches!(
            parse_feature_collection(json.as_bytes()),
            Err(FuseError::UnsupportedGeometry(_))
        ));
    }

    #[test]
    fn malformed_payload_is_fetch_failed() {
        assert!(matches!(
            parse_feature_collection(b"{not json"),
            Err(FuseError::FetchFailed(_))
        ));
    }
}
