//! Core divergence detection algorithms
//!
//! Finds local extrema in a price series and an aligned momentum oscillator,
//! groups them into monotonic runs (higher highs, lower highs, higher lows,
//! lower lows), labels the bar at which each run is confirmed, and compares
//! the two label sets to classify divergences.
//!
//! ## Pipeline
//!
//! 1. [`extrema`] - windowed local extremum test (plateaus count on both sides)
//! 2. [`runs`] - fixed-length monotonic runs over one-sided extrema
//! 3. [`peaks`] - signed `highs`/`lows` label arrays, confirmed `order` bars later
//! 4. [`classifier`] - regular/hidden, bullish/bearish divergence events
//!
//! [`DivergenceDetector`] wires the four stages together over an
//! [`AlignedSeries`]. Every call is pure: nothing is cached between calls,
//! so one detector can be shared across threads.

pub mod classifier;
pub mod detector;
pub mod errors;
pub mod extrema;
pub mod observer;
pub mod peaks;
pub mod runs;
pub mod types;
pub mod window;

// Test utilities (only available in test builds or with test-utils feature)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export commonly used types
pub use classifier::{
    classify, classify_tail, classify_window, window_trend, Classification, DivergenceEvent,
    DivergenceKind, ScanMode, Signal,
};
pub use detector::{DetectionReport, DetectorConfig, DivergenceDetector};
pub use errors::DetectionError;
pub use extrema::{find_extrema, find_maxima, find_minima, ExtremumSide};
pub use observer::{DetectionObserver, NoopObserver, TracingObserver};
pub use peaks::{label_peaks, label_window, PeakLabels, SeriesStructure};
pub use runs::{build_runs, build_runs_with, Run, RunKind, RunSeeding};
pub use types::{Candle, CandleSeries};
pub use window::{AlignedSeries, AlignedWindow};
