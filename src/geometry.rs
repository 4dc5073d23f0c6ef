use geo::Coord;

use crate::error::FuseError;

/// Center of the axis-aligned bounding box of a point ring already in
/// target space.
///
/// This is deliberately the bounding-box center, not the area or vertex
/// centroid: for a concave or irregular outline the returned point may lie
/// outside the polygon. The renderer anchors its markers there regardless,
/// matching how the captured circles were summarized upstream.
pub fn bounding_box_center(points: &[Coord<f64>]) -> Result<Coord<f64>, FuseError> {
    let first = points.first().ok_or(FuseError::EmptyGeometry)?;

    let mut x_min = first.x;
    let mut x_max = first.x;
    let mut y_min = first.y;
    let mut y_max = first.y;
    for point in &points[1..] {
        x_min = x_min.min(point.x);
        x_max = x_max.max(point.x);
        y_min = y_min.min(point.y);
        y_max = y_max.max(point.y);
    }

    Ok(Coord { x: (x_min + x_max) / 2.0, y: (y_min + y_max) / 2.0 })
}
