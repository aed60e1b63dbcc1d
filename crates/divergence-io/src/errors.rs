//! Candle loading errors

use thiserror::Error;

/// Candle loading errors
///
/// Every variant carries the source path; row-level variants also carry the
/// 1-based data row (header excluded).
#[derive(Debug, Error)]
pub enum CandleLoadError {
    /// File I/O error (propagate without modification)
    #[error("File I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON document does not have the expected shape
    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// CSV parsing error
    #[error("CSV parse error at row {row} in {path}: {source}")]
    Csv {
        path: String,
        row: usize,
        #[source]
        source: csv::Error,
    },

    /// Row with the wrong number of fields
    #[error("Malformed row {row} in {path}: {reason}")]
    MalformedRow {
        path: String,
        row: usize,
        reason: String,
    },

    /// Field that does not parse as a number
    #[error("Invalid {field} at row {row} in {path}: '{value}'")]
    InvalidNumber {
        path: String,
        row: usize,
        field: &'static str,
        value: String,
    },

    /// File contained no candles
    #[error("No candles in {path}")]
    Empty { path: String },
}
