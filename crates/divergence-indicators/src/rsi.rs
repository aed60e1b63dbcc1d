//! Relative Strength Index with Wilder smoothing

use divergence_core::{Candle, CandleSeries};
use serde::{Deserialize, Serialize};

/// Indicator computation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndicatorError {
    #[error("Invalid period: must be greater than 0")]
    InvalidPeriod,
    #[error("Insufficient data points: needed {needed}, available {available}")]
    InsufficientData { needed: usize, available: usize },
}

/// A bounded oscillator computed from a close series
///
/// Output is aligned to the tail of the input: the last output value
/// belongs to the last input value, and the first `warmup()` inputs have no
/// output.
pub trait Oscillator {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    /// Number of leading inputs without an output value
    fn warmup(&self) -> usize;

    /// Compute over a whole series
    fn compute(&self, closes: &[f64]) -> Result<Vec<f64>, IndicatorError>;

    /// Compute over the closes of a candle series
    fn compute_series(&self, series: &CandleSeries) -> Result<Vec<f64>, IndicatorError> {
        self.compute(&series.closes())
    }
}

/// Streaming RSI
///
/// The first `period` price changes seed the average gain and loss with a
/// simple mean. After that each change is folded in as
/// `avg = (avg * (period - 1) + change) / period`.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    previous_price: Option<f64>,
    changes_seen: usize,
    avg_gain: f64,
    avg_loss: f64,
}

impl Rsi {
    /// Create new RSI with specified period (typically 14)
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidPeriod);
        }

        Ok(Self {
            period,
            previous_price: None,
            changes_seen: 0,
            avg_gain: 0.0,
            avg_loss: 0.0,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Update with new price and return RSI value once warmed up
    pub fn update(&mut self, price: f64) -> Option<f64> {
        let prev_price = self.previous_price.replace(price)?;

        let change = price - prev_price;
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };

        let period = self.period as f64;
        self.changes_seen += 1;

        if self.changes_seen < self.period {
            self.avg_gain += gain;
            self.avg_loss += loss;
            return None;
        }

        if self.changes_seen == self.period {
            self.avg_gain = (self.avg_gain + gain) / period;
            self.avg_loss = (self.avg_loss + loss) / period;
        } else {
            self.avg_gain = (self.avg_gain * (period - 1.0) + gain) / period;
            self.avg_loss = (self.avg_loss * (period - 1.0) + loss) / period;
        }

        Some(self.value())
    }

    /// Update with a candle's close
    pub fn update_from_candle(&mut self, candle: &Candle) -> Option<f64> {
        self.update(candle.close)
    }

    /// `100 * gain / (gain + loss)`; 0 when the window never moved
    fn value(&self) -> f64 {
        let total = self.avg_gain + self.avg_loss;
        if total == 0.0 {
            0.0
        } else {
            100.0 * (self.avg_gain / total)
        }
    }
}

/// Batch RSI over `closes`
///
/// Returns `closes.len() - period` values; value `j` belongs to
/// `closes[j + period]`.
///
/// # Errors
///
/// - [`IndicatorError::InvalidPeriod`] when `period == 0`
/// - [`IndicatorError::InsufficientData`] with fewer than `period + 1` closes
pub fn rsi(closes: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    let mut state = Rsi::new(period)?;
    let needed = period + 1;
    if closes.len() < needed {
        return Err(IndicatorError::InsufficientData {
            needed,
            available: closes.len(),
        });
    }

    Ok(closes.iter().filter_map(|&c| state.update(c)).collect())
}

/// RSI as an [`Oscillator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsiOscillator {
    pub period: usize,
}

impl Default for RsiOscillator {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl RsiOscillator {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidPeriod);
        }
        Ok(Self { period })
    }
}

impl Oscillator for RsiOscillator {
    fn name(&self) -> &str {
        "rsi"
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Result<Vec<f64>, IndicatorError> {
        rsi(closes, self.period)
    }
}
