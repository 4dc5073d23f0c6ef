mod csv;
mod geojson;

pub use csv::{parse_tabular, CsvSource};
pub use geojson::{normalize_name, parse_feature_collection, GeoJsonSource};

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::FuseError;
use crate::types::{PolygonFeature, TabularDataset};

/// External collaborator supplying the raw survey table. All failure modes
/// (network error, non-2xx status, malformed payload) surface as a single
/// `FetchFailed` condition.
pub trait TabularSource: Send + Sync {
    fn fetch(&self) -> Result<TabularDataset, FuseError>;
}

/// External collaborator supplying the polygon feature collection.
pub trait FeatureSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<PolygonFeature>, FuseError>;
}

/// Where a dataset lives: an `http(s)://` URL or a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    Url(String),
    Path(PathBuf),
}

impl DataLocation {
    /// Scheme-based split: anything that is not an http(s) URL is a path.
    pub fn parse(spec: &str) -> Self {
        if spec.starts_with("http://") || spec.starts_with("https://") {
            Self::Url(spec.to_string())
        } else {
            Self::Path(PathBuf::from(spec))
        }
    }

    pub(crate) fn read_bytes(&self) -> Result<Vec<u8>, FuseError> {
        match self {
            Self::Url(url) => {
                let client = reqwest::blocking::Client::builder()
                    .timeout(Duration::from_secs(30))
                    .build()
                    .map_err(|e| FuseError::FetchFailed(format!("build http client: {e}")))?;
                let response = client
                    .get(url)
                    .send()
                    .map_err(|e| FuseError::FetchFailed(format!("GET {url}: {e}")))?
                    .error_for_status()
                    .map_err(|e| FuseError::FetchFailed(format!("GET {url}: {e}")))?;
                response
                    .bytes()
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| FuseError::FetchFailed(format!("read body of {url}: {e}")))
            }
            Self::Path(path) => std::fs::read(path)
                .map_err(|e| FuseError::FetchFailed(format!("read {}: {e}", path.display()))),
        }
    }
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}
