//! CSV candle loader
//!
//! ```csv
//! open_time,open,high,low,close,base_volume,quote_volume
//! 1700000000000,100.0,101.0,99.0,100.5,10.0,1005.0
//! ```
//!
//! An optional `close_time` column overrides `open_time + interval`.

use crate::errors::CandleLoadError;
use divergence_core::types::{close_time_after, is_representable};
use divergence_core::{Candle, CandleSeries};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
struct CandleRecord {
    open_time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    base_volume: f64,
    quote_volume: f64,
    #[serde(default)]
    close_time: Option<i64>,
}

impl CandleRecord {
    /// Explicit close time, or `open_time + interval`; the offending field on failure
    fn resolve_close_time(&self, interval_ms: i64) -> Result<i64, (&'static str, i64)> {
        match self.close_time {
            Some(close_time) if is_representable(close_time) => Ok(close_time),
            Some(close_time) => Err(("close_time", close_time)),
            None => close_time_after(self.open_time, interval_ms)
                .ok_or(("open_time", self.open_time)),
        }
    }

    fn into_candle(self, close_time: i64) -> Candle {
        Candle {
            open_time: self.open_time,
            close_time,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            base_volume: self.base_volume,
            quote_volume: self.quote_volume,
        }
    }

    fn non_finite_field(&self) -> Option<(&'static str, f64)> {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("base_volume", self.base_volume),
            ("quote_volume", self.quote_volume),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
    }
}

/// Load a CSV candle file
pub fn load_csv(path: &Path, interval_ms: i64) -> Result<CandleSeries, CandleLoadError> {
    let path_str = path.to_string_lossy().to_string();

    let file = std::fs::File::open(path).map_err(|e| CandleLoadError::Io {
        path: path_str.clone(),
        source: e,
    })?;

    let series = read_csv(file, &path_str, interval_ms)?;
    info!(path = %path_str, candles = series.len(), "loaded candles");
    Ok(series)
}

/// Read CSV candles from any reader
///
/// `origin` names the source in error messages.
pub fn read_csv<R: Read>(
    reader: R,
    origin: &str,
    interval_ms: i64,
) -> Result<CandleSeries, CandleLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut candles = Vec::new();

    for (i, result) in reader.deserialize().enumerate() {
        let row = i + 1;
        let record: CandleRecord = result.map_err(|e| CandleLoadError::Csv {
            path: origin.to_string(),
            row,
            source: e,
        })?;

        if let Some((field, value)) = record.non_finite_field() {
            return Err(CandleLoadError::InvalidNumber {
                path: origin.to_string(),
                row,
                field,
                value: value.to_string(),
            });
        }

        let close_time = record.resolve_close_time(interval_ms).map_err(|(field, value)| {
            CandleLoadError::InvalidNumber {
                path: origin.to_string(),
                row,
                field,
                value: value.to_string(),
            }
        })?;

        candles.push(record.into_candle(close_time));
    }

    if candles.is_empty() {
        return Err(CandleLoadError::Empty {
            path: origin.to_string(),
        });
    }

    Ok(CandleSeries::from_candles(candles))
}
