use geo::Coord;

use crate::error::FuseError;

/// Rectangular bound in geographic (lon/lat) space.
///
/// Bounds are direction-agnostic: the source scene has `lat_min > lat_max`
/// because the capture extent was recorded top-to-bottom. Only a zero-width
/// or non-finite axis is invalid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceExtent {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

/// Rectangular bound in the target rendering coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetExtent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// A validated source/target extent pair. Construction is the single place
/// zero-width axes are rejected, so `project` itself never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    source: SourceExtent,
    target: TargetExtent,
}

impl Extents {
    pub fn new(source: SourceExtent, target: TargetExtent) -> Result<Self, FuseError> {
        check_axis("lon", source.lon_min, source.lon_max)?;
        check_axis("lat", source.lat_min, source.lat_max)?;
        check_axis("x", target.x_min, target.x_max)?;
        check_axis("y", target.y_min, target.y_max)?;
        Ok(Self { source, target })
    }

    pub fn source(&self) -> &SourceExtent {
        &self.source
    }

    pub fn target(&self) -> &TargetExtent {
        &self.target
    }
}

fn check_axis(name: &str, min: f64, max: f64) -> Result<(), FuseError> {
    let width = max - min;
    if !width.is_finite() || width == 0.0 {
        return Err(FuseError::FatalConfiguration(format!(
            "{name} extent has zero or non-finite width ({min}..{max})"
        )));
    }
    Ok(())
}

/// Linearly rescale a geographic coordinate into target space.
///
/// Longitude maps directly onto x; latitude maps onto y with a vertical
/// flip (`y = y_max - ...`) because the target coordinate space has an
/// inverted vertical axis relative to geographic latitude. Pure and
/// stateless; axes scale independently, with no aspect correction.
pub fn project(lon: f64, lat: f64, extents: &Extents) -> Result<Coord<f64>, FuseError> {
    if !lon.is_finite() || !lat.is_finite() {
        return Err(FuseError::InvalidCoordinate(format!("({lon}, {lat})")));
    }

    let src = extents.source();
    let tgt = extents.target();
    let dx = tgt.x_max - tgt.x_min;
    let dy = tgt.y_max - tgt.y_min;
    let dlon = src.lon_max - src.lon_min;
    let dlat = src.lat_max - src.lat_min;

    let x = (lon - src.lon_min) / dlon * dx + tgt.x_min;
    let y = tgt.y_max - (lat - src.lat_min) / dlat * dy;
    Ok(Coord { x, y })
}

/// Element-wise `project` over a ring, preserving input order and length.
pub fn project_all(coords: &[Coord<f64>], extents: &Extents) -> Result<Vec<Coord<f64>>, FuseError> {
    coords
        .iter()
        .map(|coord| project(coord.x, coord.y, extents))
        .collect()
}
