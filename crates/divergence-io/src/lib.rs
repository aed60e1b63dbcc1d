//! Candle input for divergence detection
//!
//! Two on-disk formats are supported:
//!
//! - **Kline JSON** as served by exchange REST APIs:
//!   `{"list": [[openTime, open, high, low, close, baseVolume, quoteVolume], ...]}`,
//!   values as strings or numbers, usually newest first.
//! - **CSV** with a header row:
//!   `open_time,open,high,low,close,base_volume,quote_volume[,close_time]`.
//!
//! Both loaders return a [`CandleSeries`](divergence_core::CandleSeries)
//! sorted oldest first. Loading is strict: any malformed row fails the whole
//! file with its row number.

pub mod csv_file;
pub mod errors;
pub mod kline_json;

pub use csv_file::{load_csv, read_csv};
pub use errors::CandleLoadError;
pub use kline_json::{load_kline_json, parse_kline_json};

use divergence_core::CandleSeries;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Candle file format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CandleFormat {
    /// Exchange kline JSON
    Json,
    /// Header row plus one candle per line
    Csv,
}

impl CandleFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(CandleFormat::Json),
            "csv" => Some(CandleFormat::Csv),
            _ => None,
        }
    }
}

impl std::fmt::Display for CandleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandleFormat::Json => write!(f, "json"),
            CandleFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Load candles in the given format
///
/// `interval_ms` fills in close times the source does not carry.
pub fn load_candles(
    path: &Path,
    format: CandleFormat,
    interval_ms: i64,
) -> Result<CandleSeries, CandleLoadError> {
    match format {
        CandleFormat::Json => load_kline_json(path, interval_ms),
        CandleFormat::Csv => load_csv(path, interval_ms),
    }
}
