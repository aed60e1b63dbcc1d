//! Scan pipeline behind the `divergence-scan` binary
//!
//! Load candles, keep the configured window, compute RSI, align it with
//! price and run the detector.

use divergence_config::{Settings, SettingsError};
use divergence_core::{
    AlignedSeries, DetectionError, DetectionObserver, DetectionReport, DivergenceDetector,
};
use divergence_indicators::{IndicatorError, Oscillator, RsiOscillator};
use divergence_io::{load_candles, CandleLoadError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Scan failures, one variant per pipeline stage
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Load(#[from] CandleLoadError),

    #[error("RSI computation failed: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("Detection failed: {0}")]
    Detection(#[from] DetectionError),
}

/// Result of one scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub symbol: String,
    /// Candles in the file
    pub candles_loaded: usize,
    /// Candles analysed (the most recent `window_size`)
    pub window_size: usize,
    pub report: DetectionReport,
}

/// Run the scan described by `settings`
pub fn scan(
    settings: &Settings,
    observer: Arc<dyn DetectionObserver>,
) -> Result<ScanOutcome, ScanError> {
    settings.validate()?;
    let data = &settings.data;

    let series = load_candles(&data.candle_file, data.format, data.interval_ms())?;
    let window = series.tail(data.window_size)?;
    let skipped = series.len() - window.len();
    debug!(
        loaded = series.len(),
        window = window.len(),
        skipped,
        "candle window selected"
    );

    let closes = window.closes();
    let dates = window.dates();
    let oscillator = RsiOscillator::new(data.rsi_period)?;
    let rsi = oscillator.compute(&closes)?;

    let aligned = AlignedSeries::align(&closes, &dates, &rsi)?.offset_by(skipped);
    let detector = DivergenceDetector::with_observer(settings.detector, observer)?;
    let report = detector.detect(&aligned)?;

    info!(
        symbol = %data.symbol,
        oscillator = oscillator.name(),
        aligned = aligned.len(),
        events = report.classification.events().len(),
        signal = %report.signal(),
        dropped = report.dropped(),
        collisions = report.collisions(),
        "scan complete"
    );

    Ok(ScanOutcome {
        symbol: data.symbol.clone(),
        candles_loaded: series.len(),
        window_size: window.len(),
        report,
    })
}
