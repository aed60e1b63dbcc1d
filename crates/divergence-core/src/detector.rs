//! End-to-end divergence detection over an aligned price/oscillator pair

use crate::classifier::{classify_tail, classify_window, Classification, ScanMode, Signal};
use crate::errors::{check_order, check_run_length, DetectionError};
use crate::observer::{DetectionObserver, NoopObserver};
use crate::peaks::{PeakLabels, SeriesStructure};
use crate::runs::RunSeeding;
use crate::window::{AlignedSeries, AlignedWindow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Detection parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Half-width of the extremum comparison window
    pub order: usize,

    /// Target run length
    pub k: usize,

    /// Handling of the candidate that breaks a run
    pub seeding: RunSeeding,

    pub scan_mode: ScanMode,

    /// Positions inspected by [`ScanMode::TailGated`]
    pub tail_size: usize,

    /// Restrict tail-gated rules to the window trend direction
    pub require_trend_gate: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            order: 4,
            k: 2,
            seeding: RunSeeding::Strict,
            scan_mode: ScanMode::Full,
            tail_size: 3,
            require_trend_gate: true,
        }
    }
}

impl DetectorConfig {
    /// Minimum run length accepted by the detector
    pub const MIN_RUN_LENGTH: usize = 2;

    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// - [`DetectionError::InvalidOrder`] when `order < 1`
    /// - [`DetectionError::InvalidRunLength`] when `k < 2`
    /// - [`DetectionError::InvalidTailSize`] when `tail_size < 1`
    pub fn validate(&self) -> Result<(), DetectionError> {
        check_order(self.order)?;
        check_run_length(self.k, Self::MIN_RUN_LENGTH)?;
        if self.tail_size < 1 {
            return Err(DetectionError::InvalidTailSize {
                tail_size: self.tail_size,
            });
        }
        Ok(())
    }
}

/// Everything computed by one [`DivergenceDetector::detect`] call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Offset of the analysed window into the original history
    pub start_offset: usize,
    pub price_structure: SeriesStructure,
    pub oscillator_structure: SeriesStructure,
    pub price_labels: PeakLabels,
    pub oscillator_labels: PeakLabels,
    pub classification: Classification,
}

impl DetectionReport {
    pub fn signal(&self) -> Signal {
        self.classification.signal()
    }

    /// Labels skipped across both series
    pub fn dropped(&self) -> usize {
        self.price_labels.dropped + self.oscillator_labels.dropped
    }

    /// Label overwrites across both series
    pub fn collisions(&self) -> usize {
        self.price_labels.collisions + self.oscillator_labels.collisions
    }
}

/// Runs the extrema, run, label and classification stages
///
/// Holds only configuration and an observer, so one instance can serve any
/// number of concurrent `detect` calls.
#[derive(Clone)]
pub struct DivergenceDetector {
    config: DetectorConfig,
    observer: Arc<dyn DetectionObserver>,
}

impl fmt::Debug for DivergenceDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DivergenceDetector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DivergenceDetector {
    /// Create a detector with no diagnostics
    ///
    /// # Errors
    ///
    /// Propagates [`DetectorConfig::validate`] failures.
    pub fn new(config: DetectorConfig) -> Result<Self, DetectionError> {
        Self::with_observer(config, Arc::new(NoopObserver))
    }

    pub fn with_observer(
        config: DetectorConfig,
        observer: Arc<dyn DetectionObserver>,
    ) -> Result<Self, DetectionError> {
        config.validate()?;
        Ok(Self { config, observer })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect divergences between the price and oscillator of `series`
    pub fn detect(&self, series: &AlignedSeries) -> Result<DetectionReport, DetectionError> {
        let price_window = series.price_window();
        let oscillator_window = series.oscillator_window();

        let (price_structure, price_labels) = self.label("price", price_window)?;
        let (oscillator_structure, oscillator_labels) =
            self.label("oscillator", oscillator_window)?;

        let classification = match self.config.scan_mode {
            ScanMode::Full => Classification::Events(classify_window(
                &price_labels,
                &oscillator_labels,
                series.dates(),
                series.start_offset(),
                self.observer.as_ref(),
            )?),
            ScanMode::TailGated => Classification::Signal(classify_tail(
                &price_labels,
                &oscillator_labels,
                series.price(),
                self.config.tail_size,
                self.config.require_trend_gate,
            )?),
        };

        Ok(DetectionReport {
            start_offset: series.start_offset(),
            price_structure,
            oscillator_structure,
            price_labels,
            oscillator_labels,
            classification,
        })
    }

    fn label(
        &self,
        name: &str,
        window: AlignedWindow<'_>,
    ) -> Result<(SeriesStructure, PeakLabels), DetectionError> {
        let DetectorConfig {
            order, k, seeding, ..
        } = self.config;
        let observer = self.observer.as_ref();

        let structure = SeriesStructure::scan(window, order, k, seeding, name, observer)?;
        let labels = PeakLabels::from_structure(window, order, &structure, name, observer);
        Ok((structure, labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::DivergenceKind;
    use crate::test_utils::generators::{regular_bearish_pair, regular_bullish_pair};
    use crate::test_utils::hourly_dates;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn config(scan_mode: ScanMode) -> DetectorConfig {
        DetectorConfig {
            order: 1,
            k: 2,
            scan_mode,
            ..DetectorConfig::default()
        }
    }

    fn aligned(price: Vec<f64>, oscillator: Vec<f64>, offset: usize) -> AlignedSeries {
        let dates = hourly_dates(price.len());
        AlignedSeries::new(price, oscillator, dates, offset).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert_eq!(config.order, 4);
        assert_eq!(config.k, 2);
        assert_eq!(config.scan_mode, ScanMode::Full);
        assert_eq!(config.tail_size, 3);
        assert!(config.require_trend_gate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let bad_order = DetectorConfig {
            order: 0,
            ..DetectorConfig::default()
        };
        assert_eq!(
            DivergenceDetector::new(bad_order).unwrap_err(),
            DetectionError::InvalidOrder { order: 0 }
        );

        let bad_k = DetectorConfig {
            k: 1,
            ..DetectorConfig::default()
        };
        assert_eq!(
            bad_k.validate().unwrap_err(),
            DetectionError::InvalidRunLength { k: 1, min: 2 }
        );

        let bad_tail = DetectorConfig {
            tail_size: 0,
            ..DetectorConfig::default()
        };
        assert_eq!(
            bad_tail.validate().unwrap_err(),
            DetectionError::InvalidTailSize { tail_size: 0 }
        );
    }

    #[test]
    fn test_full_scan_finds_regular_bullish() {
        let (price, rsi) = regular_bullish_pair();
        let detector = DivergenceDetector::new(config(ScanMode::Full)).unwrap();
        let report = detector.detect(&aligned(price, rsi, 14)).unwrap();

        let events = report.classification.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, DivergenceKind::RegularBullish);
        assert_eq!(events[0].index, 4);
        assert_eq!(events[0].absolute_index, 18);
        assert_eq!(report.start_offset, 14);
        assert_eq!(report.price_structure.minima, vec![1, 3]);
        assert_eq!(report.signal(), Signal::Bullish);
    }

    #[test]
    fn test_full_scan_finds_regular_bearish() {
        let (price, rsi) = regular_bearish_pair();
        let detector = DivergenceDetector::new(config(ScanMode::Full)).unwrap();
        let report = detector.detect(&aligned(price, rsi, 0)).unwrap();

        let kinds: Vec<_> = report
            .classification
            .events()
            .iter()
            .map(|e| (e.index, e.kind))
            .collect();
        assert_eq!(kinds, vec![(4, DivergenceKind::RegularBearish)]);
    }

    #[test]
    fn test_tail_gated_signals() {
        let detector = DivergenceDetector::new(config(ScanMode::TailGated)).unwrap();

        let (price, rsi) = regular_bullish_pair();
        let report = detector.detect(&aligned(price, rsi, 0)).unwrap();
        assert_eq!(report.classification, Classification::Signal(Signal::Bullish));

        let (price, rsi) = regular_bearish_pair();
        let report = detector.detect(&aligned(price, rsi, 0)).unwrap();
        assert_eq!(report.classification, Classification::Signal(Signal::Bearish));
    }

    #[test]
    fn test_tail_longer_than_window() {
        let detector = DivergenceDetector::new(DetectorConfig {
            tail_size: 10,
            ..config(ScanMode::TailGated)
        })
        .unwrap();
        let (price, rsi) = regular_bullish_pair();

        assert_eq!(
            detector.detect(&aligned(price, rsi, 0)).unwrap_err(),
            DetectionError::InsufficientData {
                needed: 10,
                available: 6
            }
        );
    }

    #[test]
    fn test_collision_counters_reported() {
        let (price, rsi) = regular_bullish_pair();
        let detector = DivergenceDetector::new(config(ScanMode::Full)).unwrap();
        let report = detector.detect(&aligned(price, rsi, 0)).unwrap();

        // The single maximum in each series yields an HH and an LH singleton at the same index
        assert_eq!(report.price_labels.collisions, 1);
        assert_eq!(report.oscillator_labels.collisions, 1);
        assert_eq!(report.collisions(), 2);
        assert_eq!(report.dropped(), 0);
    }

    #[derive(Default)]
    struct EventCounter {
        events: AtomicUsize,
        extrema_calls: AtomicUsize,
    }

    impl DetectionObserver for EventCounter {
        fn on_extrema(&self, _series: &str, _side: crate::ExtremumSide, _indices: &[usize]) {
            self.extrema_calls.fetch_add(1, Ordering::Relaxed);
        }

        fn on_divergence(&self, _event: &crate::DivergenceEvent) {
            self.events.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_observer_receives_hooks() {
        let observer = Arc::new(EventCounter::default());
        let detector =
            DivergenceDetector::with_observer(config(ScanMode::Full), observer.clone()).unwrap();
        let (price, rsi) = regular_bullish_pair();
        detector.detect(&aligned(price, rsi, 0)).unwrap();

        // Two sides for each of two series
        assert_eq!(observer.extrema_calls.load(Ordering::Relaxed), 4);
        assert_eq!(observer.events.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_report_and_config_serialize() {
        let (price, rsi) = regular_bullish_pair();
        let detector = DivergenceDetector::new(config(ScanMode::Full)).unwrap();
        let report = detector.detect(&aligned(price, rsi, 0)).unwrap();

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"regular_bullish\""));
        let parsed: DetectionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);

        let config: DetectorConfig =
            serde_json::from_str(r#"{"order": 2, "scan_mode": "tail_gated"}"#).unwrap();
        assert_eq!(config.order, 2);
        assert_eq!(config.k, 2);
        assert_eq!(config.scan_mode, ScanMode::TailGated);
        assert_eq!(config.seeding, RunSeeding::Strict);
    }

    #[test]
    fn test_detector_is_reusable() {
        let detector = DivergenceDetector::new(config(ScanMode::Full)).unwrap();
        let (price, rsi) = regular_bullish_pair();
        let series = aligned(price, rsi, 0);

        let first = detector.detect(&series).unwrap();
        let second = detector.detect(&series).unwrap();
        assert_eq!(first, second);
    }
}
