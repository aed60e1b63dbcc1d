//! Candle types

use crate::errors::DetectionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported candle intervals and their length in minutes
pub const PERIODS: [(&str, u32); 4] = [("15m", 15), ("1h", 60), ("4h", 240), ("1d", 1440)];

/// Interval length in minutes for a period name like `"1h"`
pub fn period_minutes(period: &str) -> Option<u32> {
    PERIODS
        .iter()
        .find(|(name, _)| *name == period)
        .map(|(_, minutes)| *minutes)
}

/// True when `timestamp_ms` maps to a `DateTime<Utc>`
pub fn is_representable(timestamp_ms: i64) -> bool {
    DateTime::from_timestamp_millis(timestamp_ms).is_some()
}

/// Close time of a candle opening at `open_time`
///
/// `None` when the sum overflows or lands outside the representable date range.
pub fn close_time_after(open_time: i64, interval_ms: i64) -> Option<i64> {
    open_time
        .checked_add(interval_ms)
        .filter(|&close_time| is_representable(close_time))
}

/// One OHLCV candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time in milliseconds since epoch
    pub open_time: i64,

    /// Close time in milliseconds since epoch
    pub close_time: i64,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,

    /// Volume in the base asset
    pub base_volume: f64,

    /// Volume in the quote asset
    pub quote_volume: f64,
}

impl Candle {
    /// Close time as a UTC timestamp
    ///
    /// The loaders only build candles whose close time passes
    /// [`is_representable`]; hand-built candles outside that range map to the
    /// epoch.
    pub fn close_date(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.close_time).unwrap_or_default()
    }
}

/// Candles ordered oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Build a series, sorting by open time
    ///
    /// Exchange feeds often deliver newest first; the rest of the pipeline
    /// assumes the last candle is the most recent.
    pub fn from_candles(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.open_time);
        Self { candles }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// Close timestamps, one per candle
    pub fn dates(&self) -> Vec<DateTime<Utc>> {
        self.candles.iter().map(Candle::close_date).collect()
    }

    /// The most recent `n` candles
    ///
    /// # Errors
    ///
    /// [`DetectionError::InsufficientData`] if the series holds fewer than `n`.
    pub fn tail(&self, n: usize) -> Result<Self, DetectionError> {
        if n > self.candles.len() {
            return Err(DetectionError::InsufficientData {
                needed: n,
                available: self.candles.len(),
            });
        }
        Ok(Self {
            candles: self.candles[self.candles.len() - n..].to_vec(),
        })
    }
}
