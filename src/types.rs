use std::sync::Arc;

use geo::Coord;

/// One survey record: an ordered row of field values accessed by positional
/// column index. Column semantics come from the injected `AttributeTable`.
pub type Record = Vec<String>;

/// Parsed tabular dataset: header row plus data rows in file order.
/// Records are reference-counted so a fused datum can share its matched row
/// with the dataset without copying.
#[derive(Debug, Clone, Default)]
pub struct TabularDataset {
    pub headers: Vec<String>,
    pub records: Vec<Arc<Record>>,
}

impl TabularDataset {
    /// First record whose field at `key_column` equals `key`, if any.
    /// Duplicate keys resolve to the first match.
    pub fn find_by_key(&self, key_column: usize, key: &str) -> Option<Arc<Record>> {
        self.records
            .iter()
            .find(|record| record.get(key_column).is_some_and(|field| field == key))
            .cloned()
    }
}

/// A polygon feature pulled out of a GeoJSON feature collection: the
/// normalized display name (join key) and the outer ring of the first
/// polygon, as (lon, lat) pairs in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonFeature {
    pub name: String,
    pub coords: Vec<Coord<f64>>,
}

/// The joined unit: a polygon feature plus its matched survey record.
/// An absent record is a valid, expected state (the feature had no match),
/// not an error. Immutable after fusion; projected geometry lives in
/// `render::RenderDatum`, built fresh each render cycle.
#[derive(Debug, Clone)]
pub struct FusedDatum {
    pub name: String,
    pub coords: Vec<Coord<f64>>,
    pub record: Option<Arc<Record>>,
}
