use thiserror::Error;

/// Error taxonomy for the fusion engine.
///
/// Transform and geometry errors are per-datum: they abort processing of the
/// offending polygon only and are collected into a failure list by the render
/// pass. Fetch failures abort the whole fusion operation with no partial
/// cache write, and the next request retries from scratch.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FuseError {
    /// Longitude/latitude input that is unparseable or non-finite.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// A polygon with zero vertices.
    #[error("empty geometry")]
    EmptyGeometry,

    /// A feature whose geometry is not the expected MultiPolygon shape.
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    /// Network, status, or payload failure inside a record fetcher.
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    /// Surfaced by the data store when a fetch or parse failed; nothing was
    /// cached and the next call will retry.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// A coordinate extent with a zero-width or non-finite axis.
    #[error("fatal configuration: {0}")]
    FatalConfiguration(String),
}
