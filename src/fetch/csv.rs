use std::io::Cursor;
use std::sync::Arc;

use polars::prelude::*;

use super::{DataLocation, TabularSource};
use crate::error::FuseError;
use crate::types::TabularDataset;

/// Fetches and parses the survey CSV into positional records.
#[derive(Debug, Clone)]
pub struct CsvSource {
    location: DataLocation,
}

impl CsvSource {
    pub fn new(location: DataLocation) -> Self {
        Self { location }
    }
}

impl TabularSource for CsvSource {
    fn fetch(&self) -> Result<TabularDataset, FuseError> {
        let bytes = self.location.read_bytes()?;
        parse_tabular(&bytes)
    }
}

/// Parse CSV bytes into a row-major dataset.
///
/// Everything is read as String (no schema inference): downstream access is
/// by positional column index against an externally defined attribute table,
/// and mixed-type columns in the survey export would otherwise break
/// inference. Null fields become empty strings.
pub fn parse_tabular(bytes: &[u8]) -> Result<TabularDataset, FuseError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| FuseError::FetchFailed(format!("parse csv: {e}")))?;

    let headers = df.get_column_names().into_iter().map(|name| name.to_string()).collect();

    // Polars is column-major; transpose into the row-major records the join
    // and classifier index into.
    let mut rows = vec![Vec::with_capacity(df.width()); df.height()];
    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let values = series.str().map_err(|e| {
            FuseError::FetchFailed(format!("column {} is not string-typed: {e}", series.name()))
        })?;
        for (row, value) in values.into_iter().enumerate() {
            rows[row].push(value.unwrap_or("").to_string());
        }
    }

    let records = rows.into_iter().map(Arc::new).collect();
    Ok(TabularDataset { headers, records })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
site,code,gender,age
X,A1,F,31
X,A2,M,
Y,B7,F,58
";

    #[test]
    fn rows_are_positional_and_ordered() {
        let dataset = parse_tabular(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.headers, ["site", "code", "gender", "age"]);
        assert_eq!(dataset.records.len(), 3);
        assert_eq!(*dataset.records[0], vec!["X", "A1", "F", "31"]);
        assert_eq!(dataset.records[2][1], "B7");
    }

    #[test]
    fn null_fields_become_empty_strings() {
        let dataset = parse_tabular(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.records[1][3], "");
    }

    #[test]
    fn numeric_looking_fields_stay_strings() {
        let dataset = parse_tabular(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.records[0][3], "31");
    }

    #[test]
    fn lookup_by_key_column_finds_first_match() {
        let dataset = parse_tabular(SAMPLE.as_bytes()).unwrap();
        let record = dataset.find_by_key(1, "A2").unwrap();
        assert_eq!(record[2], "M");
        assert!(dataset.find_by_key(1, "Z9").is_none());
    }

    #[test]
    fn garbage_bytes_are_fetch_failed() {
        // Not valid UTF-8 CSV.
        let result = parse_tabular(&[0xff, 0xfe, 0x00, 0x01]);
        assert!(matches!(result, Err(FuseError::FetchFailed(_))));
    }
}
