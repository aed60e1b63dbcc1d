//! RSI/price divergence detection.
//!
//! Finds local extrema in a price series and an aligned oscillator, groups
//! them into monotonic runs, labels the bar at which each run is confirmed
//! and compares the two label sets to report regular and hidden divergences.
//!
//! ## Meta-Crate
//!
//! This crate re-exports the divergence sub-crates:
//!
//! - `divergence-core` - Detection algorithms and types
//! - `divergence-indicators` - Wilder RSI
//! - `divergence-config` - Configuration management
//! - `divergence-io` - Candle loaders
//!
//! ## Features
//!
//! - `core` - Detection algorithms (always enabled)
//! - `indicators` - RSI (default)
//! - `config` - Configuration management
//! - `io` - Candle loaders
//! - `full` - Enable all features
//!
//! ## Basic Usage
//!
//! ```rust
//! use divergence::{label_peaks, build_runs, RunKind};
//!
//! let series = [1.0, 3.0, 1.0, 5.0, 1.0, 7.0, 1.0, 9.0, 1.0];
//!
//! let runs = build_runs(&series, 1, 2, RunKind::HigherHighs).unwrap();
//! assert_eq!(runs[0].indices, vec![1, 3]);
//!
//! let labels = label_peaks(&series, 1, 2).unwrap();
//! assert_eq!(labels.highs[4], 1);
//! ```
//!
//! ## Full Pipeline
//!
//! ```rust
//! # #[cfg(feature = "indicators")]
//! # {
//! use chrono::{DateTime, Duration, Utc};
//! use divergence::indicators::rsi;
//! use divergence::{AlignedSeries, DetectorConfig, DivergenceDetector};
//!
//! let closes: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 / 4.0).sin() * 5.0).collect();
//! let start = DateTime::<Utc>::default();
//! let dates: Vec<_> = (0..80).map(|i| start + Duration::hours(i)).collect();
//!
//! let oscillator = rsi(&closes, 14).unwrap();
//! let series = AlignedSeries::align(&closes, &dates, &oscillator).unwrap();
//! assert_eq!(series.start_offset(), 14);
//!
//! let detector = DivergenceDetector::new(DetectorConfig::default()).unwrap();
//! let report = detector.detect(&series).unwrap();
//! for event in report.classification.events() {
//!     println!("{event}");
//! }
//! # }
//! ```

// Re-export core (always available)
pub use divergence_core as core;

// Re-export optional crates
#[cfg(feature = "indicators")]
pub use divergence_indicators as indicators;

#[cfg(feature = "config")]
pub use divergence_config as config;

#[cfg(feature = "io")]
pub use divergence_io as io;

// Re-export commonly used types at crate root for convenience
pub use divergence_core::{
    build_runs, build_runs_with, classify, classify_tail, find_extrema, find_maxima, find_minima,
    label_peaks, AlignedSeries, AlignedWindow, Candle, CandleSeries, Classification,
    DetectionError, DetectionObserver, DetectionReport, DetectorConfig, DivergenceDetector,
    DivergenceEvent, DivergenceKind, ExtremumSide, PeakLabels, Run, RunKind, RunSeeding,
    ScanMode, Signal,
};

#[cfg(feature = "indicators")]
pub use divergence_indicators::{Oscillator, Rsi, RsiOscillator};

#[cfg(feature = "config")]
pub use divergence_config::Settings;

#[cfg(feature = "io")]
pub use divergence_io::{load_candles, CandleFormat, CandleLoadError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
