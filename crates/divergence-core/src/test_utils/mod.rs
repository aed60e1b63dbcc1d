//! Test utilities for consistent test data creation across the codebase
//!
//! - `mod.rs`: small fixtures (candles, timestamps, label arrays)
//! - `generators.rs`: deterministic price/oscillator series for integration tests

pub mod generators;

use crate::peaks::PeakLabels;
use crate::types::{Candle, CandleSeries};
use chrono::{DateTime, Duration, Utc};

/// Standard test constants
pub mod constants {
    pub const BASE_TIMESTAMP_MS: i64 = 1640995200000; // 2022-01-01 00:00:00 UTC
    pub const HOUR_MS: i64 = 3_600_000;
    pub const BASE_PRICE: f64 = 50000.0;
}

/// `n` hourly UTC timestamps starting at [`constants::BASE_TIMESTAMP_MS`]
pub fn hourly_dates(n: usize) -> Vec<DateTime<Utc>> {
    let start = DateTime::from_timestamp_millis(constants::BASE_TIMESTAMP_MS).unwrap();
    (0..n)
        .map(|i| start + Duration::hours(i as i64))
        .collect()
}

/// One-hour candle with a flat body at `close`
pub fn create_test_candle(open_time: i64, close: f64) -> Candle {
    Candle {
        open_time,
        close_time: open_time + constants::HOUR_MS,
        open: close,
        high: close,
        low: close,
        close,
        base_volume: 1.0,
        quote_volume: close,
    }
}

/// Hourly candles closing at the given prices, oldest first
pub fn create_test_series(closes: &[f64]) -> CandleSeries {
    CandleSeries::from_candles(
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                create_test_candle(
                    constants::BASE_TIMESTAMP_MS + i as i64 * constants::HOUR_MS,
                    close,
                )
            })
            .collect(),
    )
}

/// Label arrays with the given `(index, value)` entries set
pub fn labels_with(len: usize, highs: &[(usize, i8)], lows: &[(usize, i8)]) -> PeakLabels {
    let mut labels = PeakLabels::zeroed(len);
    for &(i, v) in highs {
        labels.highs[i] = v;
    }
    for &(i, v) in lows {
        labels.lows[i] = v;
    }
    labels
}
