use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeTable;
use crate::error::FuseError;
use crate::transform::SourceExtent;

/// Literal not-applicable marker used by the survey export. Values equal to
/// it are skipped during classification by exact string match; other
/// missing-value conventions are deliberately not guessed at.
pub const NA_MARKER: &str = "#NULL!";

/// Default radius for the circle-overlap density pass, in target units.
pub const DENSITY_RADIUS: f64 = 10.0;

/// Engine configuration: data locations, join key, classification marker,
/// the geographic extent of the capture scene, and the attribute table.
/// Defaults describe the scene this tool was built for; a JSON file can
/// override any field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FuseConfig {
    pub csv_url: String,
    pub geojson_url: String,
    /// Positional column holding the join key in the survey CSV.
    pub key_column: usize,
    pub na_marker: String,
    /// Geographic extent of the scene. Latitude runs top-to-bottom, matching
    /// the inverted vertical axis of the target space.
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
    pub attributes: AttributeTable,
}

impl Default for FuseConfig {
    fn default() -> Self {
        Self {
            csv_url: "http://localhost:5005/data/all_records_dta_09142020.csv".to_string(),
            geojson_url: "http://localhost:5005/data/circles_20200330CH_ChrisJose.geojson"
                .to_string(),
            key_column: 1,
            na_marker: NA_MARKER.to_string(),
            lon_min: -73.8618,
            lon_max: -73.8527,
            lat_min: 40.8391,
            lat_max: 40.8322,
            attributes: AttributeTable::survey_defaults(),
        }
    }
}

impl FuseConfig {
    /// Load a configuration file, filling unspecified fields from defaults.
    pub fn load(path: &Path) -> Result<Self, FuseError> {
        let bytes = std::fs::read(path).map_err(|e| {
            FuseError::FatalConfiguration(format!("read {}: {e}", path.display()))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            FuseError::FatalConfiguration(format!("parse {}: {e}", path.display()))
        })
    }

    pub fn source_extent(&self) -> SourceExtent {
        SourceExtent {
            lon_min: self.lon_min,
            lon_max: self.lon_max,
            lat_min: self.lat_min,
            lat_max: self.lat_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_capture_scene() {
        let config = FuseConfig::default();
        assert_eq!(config.key_column, 1);
        assert_eq!(config.na_marker, "#NULL!");
        let extent = config.source_extent();
        assert!(extent.lat_min > extent.lat_max);
        assert_eq!(config.attributes.column("GENDER"), Some(16));
    }

    #[test]
    fn partial_json_overrides_keep_defaults_elsewhere() {
        let config: FuseConfig =
            serde_json::from_str(r#"{"key_column": 2, "na_marker": "NA"}"#).unwrap();
        assert_eq!(config.key_column, 2);
        assert_eq!(config.na_marker, "NA");
        assert_eq!(config.lon_min, -73.8618);
    }
}
