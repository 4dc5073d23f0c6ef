#![doc = "Mapfuse public API"]
mod attribute;
mod classify;
mod config;
mod density;
mod error;
mod fetch;
mod geometry;
mod render;
mod store;
mod transform;
mod types;

pub mod cli;
pub mod commands;

#[doc(inline)]
pub use attribute::{AttributeDef, AttributeTable};

#[doc(inline)]
pub use classify::{class_indices, classify, Segmentation, Selector};

#[doc(inline)]
pub use config::{FuseConfig, DENSITY_RADIUS, NA_MARKER};

#[doc(inline)]
pub use density::{normalized_intensities, overlap_counts};

#[doc(inline)]
pub use error::FuseError;

#[doc(inline)]
pub use fetch::{
    normalize_name, parse_feature_collection, parse_tabular, CsvSource, DataLocation,
    FeatureSource, GeoJsonSource, TabularSource,
};

#[doc(inline)]
pub use geometry::bounding_box_center;

#[doc(inline)]
pub use render::{project_batch, RenderBatch, RenderDatum, RenderFailure};

#[doc(inline)]
pub use store::DataStore;

#[doc(inline)]
pub use transform::{project, project_all, Extents, SourceExtent, TargetExtent};

#[doc(inline)]
pub use types::{FusedDatum, PolygonFeature, Record, TabularDataset};
