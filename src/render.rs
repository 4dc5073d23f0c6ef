use geo::Coord;

use crate::error::FuseError;
use crate::geometry::bounding_box_center;
use crate::transform::{project_all, Extents};
use crate::types::FusedDatum;

/// Projected view of one fused datum for a single render cycle: the ring in
/// target space (`blob`) and its bounding-box centroid (`center`). `index`
/// points back into the fused slice so the renderer can reach the record.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDatum {
    pub index: usize,
    pub blob: Vec<Coord<f64>>,
    pub center: Coord<f64>,
}

/// A datum that could not be projected this cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFailure {
    pub index: usize,
    pub error: FuseError,
}

/// What the renderer consumes: successfully projected data plus the
/// per-datum failures. One bad polygon never aborts the batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBatch {
    pub data: Vec<RenderDatum>,
    pub failures: Vec<RenderFailure>,
}

impl RenderBatch {
    /// Centers of the projected data, in batch order. Feed for the
    /// proximity aggregator.
    pub fn centers(&self) -> Vec<Coord<f64>> {
        self.data.iter().map(|datum| datum.center).collect()
    }
}

/// Project every fused datum into target space and derive its centroid.
///
/// Built fresh each render cycle: extents may change between cycles, and
/// the cached fused data is never mutated in place.
pub fn project_batch(fused: &[FusedDatum], extents: &Extents) -> RenderBatch {
    let mut batch = RenderBatch::default();
    for (index, datum) in fused.iter().enumerate() {
        match project_datum(datum, extents) {
            Ok((blob, center)) => batch.data.push(RenderDatum { index, blob, center }),
            Err(error) => batch.failures.push(RenderFailure { index, error }),
        }
    }
    batch
}

fn project_datum(
    datum: &FusedDatum,
    extents: &Extents,
) -> Result<(Vec<Coord<f64>>, Coord<f64>), FuseError> {
    let blob = project_all(&datum.coords, extents)?;
    let center = bounding_box_center(&blob)?;
    Ok((blob, center))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{SourceExtent, TargetExtent};

    fn extents() -> Extents {
        let source =
            SourceExtent { lon_min: 0.0, lon_max: 10.0, lat_min: 0.0, lat_max: 10.0 };
        let target = TargetExtent { x_min: 0.0, x_max: 100.0, y_min: 0.0, y_max: 100.0 };
        Extents::new(source, target).unwrap()
    }

    fn datum(coords: Vec<Coord<f64>>) -> FusedDatum {
        FusedDatum { name: "blob".to_string(), coords, record: None }
    }

    #[test]
    fn projects_blob_and_center() {
        let fused = vec![datum(vec![
            Coord { x: 2.0, y: 2.0 },
            Coord { x: 4.0, y: 4.0 },
        ])];
        let batch = project_batch(&fused, &extents());

        assert_eq!(batch.data.len(), 1);
        assert!(batch.failures.is_empty());
        // Vertical flip: lat 2 -> y 80, lat 4 -> y 60.
        assert_eq!(batch.data[0].blob[0], Coord { x: 20.0, y: 80.0 });
        assert_eq!(batch.data[0].blob[1], Coord { x: 40.0, y: 60.0 });
        assert_eq!(batch.data[0].center, Coord { x: 30.0, y: 70.0 });
    }

    #[test]
    fn one_bad_datum_does_not_abort_the_batch() {
        let fused = vec![
            datum(vec![Coord { x: 2.0, y: 2.0 }]),
            datum(vec![]), // empty geometry
            datum(vec![Coord { x: f64::NAN, y: 2.0 }]),
            datum(vec![Coord { x: 6.0, y: 6.0 }]),
        ];
        let batch = project_batch(&fused, &extents());

        assert_eq!(batch.data.len(), 2);
        assert_eq!(batch.data[0].index, 0);
        assert_eq!(batch.data[1].index, 3);

        assert_eq!(batch.failures.len(), 2);
        assert_eq!(batch.failures[0].index, 1);
        assert_eq!(batch.failures[0].error, FuseError::EmptyGeometry);
        assert_eq!(batch.failures[1].index, 2);
        assert!(matches!(batch.failures[1].error, FuseError::InvalidCoordinate(_)));
    }

    #[test]
    fn centers_preserve_batch_order() {
        let fused = vec![
            datum(vec![Coord { x: 2.0, y: 2.0 }]),
            datum(vec![Coord { x: 8.0, y: 8.0 }]),
        ];
        let batch = project_batch(&fused, &extents());
        assert_eq!(
            batch.centers(),
            vec![Coord { x: 20.0, y: 80.0 }, Coord { x: 80.0, y: 20.0 }]
        );
    }
}
