//! Candle source and windowing configuration

use divergence_core::types::period_minutes;
use divergence_io::CandleFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Candle source and windowing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the candle file
    pub candle_file: PathBuf,

    /// Candle file format
    pub format: CandleFormat,

    /// Number of most recent candles analysed
    pub window_size: usize,

    /// RSI lookback period
    pub rsi_period: usize,

    /// Instrument label used in reports
    pub symbol: String,

    /// Candle interval in minutes
    pub interval_minutes: u32,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            candle_file: PathBuf::from("./data/candles.json"),
            format: CandleFormat::Json,
            window_size: 80,
            rsi_period: 14,
            symbol: "BTC/USDT".to_string(),
            interval_minutes: 60,
        }
    }
}

impl DataConfig {
    /// Candle interval in milliseconds
    pub fn interval_ms(&self) -> i64 {
        i64::from(self.interval_minutes) * 60_000
    }

    /// Set the interval from a period name (`15m`, `1h`, `4h`, `1d`)
    pub fn set_period(&mut self, period: &str) -> Result<(), String> {
        match period_minutes(period) {
            Some(minutes) => {
                self.interval_minutes = minutes;
                Ok(())
            }
            None => Err(format!(
                "Unsupported period '{}': expected one of 15m, 1h, 4h, 1d",
                period
            )),
        }
    }

    /// Number of aligned positions left after the RSI warm-up
    pub fn aligned_len(&self) -> usize {
        self.window_size.saturating_sub(self.rsi_period)
    }

    /// Validate windowing parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.rsi_period == 0 {
            return Err("RSI period must be greater than 0".to_string());
        }

        if self.window_size <= self.rsi_period {
            return Err(format!(
                "Window size {} must exceed RSI period {}",
                self.window_size, self.rsi_period
            ));
        }

        if self.interval_minutes == 0 {
            return Err("Interval must be greater than 0 minutes".to_string());
        }

        Ok(())
    }
}
