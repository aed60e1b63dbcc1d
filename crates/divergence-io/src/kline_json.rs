//! Exchange kline JSON loader

use crate::errors::CandleLoadError;
use divergence_core::types::close_time_after;
use divergence_core::{Candle, CandleSeries};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// Fields per kline row: openTime, open, high, low, close, baseVolume, quoteVolume
const KLINE_FIELDS: usize = 7;

#[derive(Debug, Deserialize)]
struct KlineDocument {
    list: Vec<Vec<Value>>,
}

/// Load a kline JSON file
pub fn load_kline_json(path: &Path, interval_ms: i64) -> Result<CandleSeries, CandleLoadError> {
    let path_str = path.to_string_lossy().to_string();

    let content = std::fs::read_to_string(path).map_err(|e| CandleLoadError::Io {
        path: path_str.clone(),
        source: e,
    })?;
    debug!(path = %path_str, bytes = content.len(), "opened kline file");

    let series = parse_kline_json(&content, &path_str, interval_ms)?;
    info!(path = %path_str, candles = series.len(), "loaded candles");
    Ok(series)
}

/// Parse kline JSON held in memory
///
/// `origin` names the source in error messages.
pub fn parse_kline_json(
    content: &str,
    origin: &str,
    interval_ms: i64,
) -> Result<CandleSeries, CandleLoadError> {
    let document: KlineDocument =
        serde_json::from_str(content).map_err(|e| CandleLoadError::Json {
            path: origin.to_string(),
            source: e,
        })?;

    if document.list.is_empty() {
        return Err(CandleLoadError::Empty {
            path: origin.to_string(),
        });
    }

    let candles = document
        .list
        .iter()
        .enumerate()
        .map(|(i, row)| parse_row(row, i + 1, origin, interval_ms))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CandleSeries::from_candles(candles))
}

fn parse_row(
    row: &[Value],
    row_number: usize,
    origin: &str,
    interval_ms: i64,
) -> Result<Candle, CandleLoadError> {
    if row.len() < KLINE_FIELDS {
        return Err(CandleLoadError::MalformedRow {
            path: origin.to_string(),
            row: row_number,
            reason: format!("expected {} fields, got {}", KLINE_FIELDS, row.len()),
        });
    }

    let number = |index: usize, field: &'static str| -> Result<f64, CandleLoadError> {
        value_as_f64(&row[index]).ok_or_else(|| CandleLoadError::InvalidNumber {
            path: origin.to_string(),
            row: row_number,
            field,
            value: row[index].to_string(),
        })
    };

    let invalid_open_time = || CandleLoadError::InvalidNumber {
        path: origin.to_string(),
        row: row_number,
        field: "open_time",
        value: row[0].to_string(),
    };
    let open_time = value_as_i64(&row[0]).ok_or_else(invalid_open_time)?;
    let close_time = close_time_after(open_time, interval_ms).ok_or_else(invalid_open_time)?;

    Ok(Candle {
        open_time,
        close_time,
        open: number(1, "open")?,
        high: number(2, "high")?,
        low: number(3, "low")?,
        close: number(4, "close")?,
        base_volume: number(5, "base_volume")?,
        quote_volume: number(6, "quote_volume")?,
    })
}

fn value_as_f64(value: &Value) -> Option<f64> {
    let parsed: Option<f64> = match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}
