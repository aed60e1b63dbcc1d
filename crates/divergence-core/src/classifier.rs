//! Divergence classification
//!
//! Compares price labels against oscillator labels position by position:
//!
//! | price lows | oscillator lows | event |
//! |---|---|---|
//! | -1 | +1 | regular bullish |
//! | +1 | -1 | hidden bullish |
//!
//! | price highs | oscillator highs | event |
//! |---|---|---|
//! | -1 | +1 | hidden bearish |
//! | +1 | -1 | regular bearish |
//!
//! Two scan modes:
//! - [`ScanMode::Full`] reports every event in the window, oldest first.
//! - [`ScanMode::TailGated`] looks only at the newest `tail_size` positions,
//!   optionally restricted to the rules matching the window trend, and returns
//!   the first directional [`Signal`] found from newest to oldest.

use crate::errors::{check_len, DetectionError};
use crate::observer::{DetectionObserver, NoopObserver};
use crate::peaks::PeakLabels;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four divergence patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceKind {
    RegularBullish,
    HiddenBullish,
    HiddenBearish,
    RegularBearish,
}

impl DivergenceKind {
    /// Evaluation order at a single position
    pub const ALL: [DivergenceKind; 4] = [
        DivergenceKind::RegularBullish,
        DivergenceKind::HiddenBullish,
        DivergenceKind::HiddenBearish,
        DivergenceKind::RegularBearish,
    ];

    const BULLISH: [DivergenceKind; 2] =
        [DivergenceKind::RegularBullish, DivergenceKind::HiddenBullish];

    const BEARISH: [DivergenceKind; 2] =
        [DivergenceKind::HiddenBearish, DivergenceKind::RegularBearish];

    pub fn is_bullish(self) -> bool {
        matches!(
            self,
            DivergenceKind::RegularBullish | DivergenceKind::HiddenBullish
        )
    }

    pub fn signal(self) -> Signal {
        if self.is_bullish() {
            Signal::Bullish
        } else {
            Signal::Bearish
        }
    }

    /// Does this pattern fire at `index`?
    fn fires(self, price: &PeakLabels, oscillator: &PeakLabels, index: usize) -> bool {
        match self {
            DivergenceKind::RegularBullish => price.lows[index] == -1 && oscillator.lows[index] == 1,
            DivergenceKind::HiddenBullish => price.lows[index] == 1 && oscillator.lows[index] == -1,
            DivergenceKind::HiddenBearish => {
                price.highs[index] == -1 && oscillator.highs[index] == 1
            }
            DivergenceKind::RegularBearish => {
                price.highs[index] == 1 && oscillator.highs[index] == -1
            }
        }
    }
}

impl fmt::Display for DivergenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DivergenceKind::RegularBullish => "Regular bullish divergence",
            DivergenceKind::HiddenBullish => "Hidden bullish divergence",
            DivergenceKind::HiddenBearish => "Hidden bearish divergence",
            DivergenceKind::RegularBearish => "Regular bearish divergence",
        };
        f.write_str(text)
    }
}

/// One classified divergence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivergenceEvent {
    pub kind: DivergenceKind,
    /// Position within the classified window
    pub index: usize,
    /// Position within the original, uncropped history
    pub absolute_index: usize,
    pub time: DateTime<Utc>,
}

impl fmt::Display for DivergenceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.time)
    }
}

/// Directional result of a tail-gated scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Bearish,
    #[default]
    Neutral,
    Bullish,
}

impl Signal {
    /// +1 bullish, -1 bearish, 0 none
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Bearish => -1,
            Signal::Neutral => 0,
            Signal::Bullish => 1,
        }
    }

    pub fn is_neutral(self) -> bool {
        self == Signal::Neutral
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Signal::Bearish => "bearish",
            Signal::Neutral => "neutral",
            Signal::Bullish => "bullish",
        })
    }
}

/// How the classifier scans the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Every position, every rule, all events collected
    #[default]
    Full,
    /// Newest `tail_size` positions only, first hit wins
    TailGated,
}

/// Classifier output for either scan mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Events(Vec<DivergenceEvent>),
    Signal(Signal),
}

impl Classification {
    /// Events of a full scan; empty for a tail-gated one
    pub fn events(&self) -> &[DivergenceEvent] {
        match self {
            Classification::Events(events) => events,
            Classification::Signal(_) => &[],
        }
    }

    /// Signal of a tail-gated scan, or the direction of the newest event of a full scan
    pub fn signal(&self) -> Signal {
        match self {
            Classification::Signal(signal) => *signal,
            Classification::Events(events) => events
                .last()
                .map(|e| e.kind.signal())
                .unwrap_or_default(),
        }
    }
}

/// Net price move over the window: first value minus last value
///
/// Negative when price ended higher than it started.
pub fn window_trend(price: &[f64]) -> f64 {
    match (price.first(), price.last()) {
        (Some(first), Some(last)) => first - last,
        _ => 0.0,
    }
}

/// Full scan: every event at every position, ascending index
///
/// # Errors
///
/// [`DetectionError::LengthMismatch`] unless both label sets and `dates`
/// share one length.
pub fn classify(
    price: &PeakLabels,
    oscillator: &PeakLabels,
    dates: &[DateTime<Utc>],
) -> Result<Vec<DivergenceEvent>, DetectionError> {
    classify_window(price, oscillator, dates, 0, &NoopObserver)
}

/// Full scan with an offset into the original history and an observer
pub fn classify_window(
    price: &PeakLabels,
    oscillator: &PeakLabels,
    dates: &[DateTime<Utc>],
    start_offset: usize,
    observer: &dyn DetectionObserver,
) -> Result<Vec<DivergenceEvent>, DetectionError> {
    check_labels(price, oscillator)?;
    check_len("dates", price.len(), dates.len())?;

    let mut events = Vec::new();
    for (index, &time) in dates.iter().enumerate() {
        for kind in DivergenceKind::ALL {
            if kind.fires(price, oscillator, index) {
                let event = DivergenceEvent {
                    kind,
                    index,
                    absolute_index: start_offset + index,
                    time,
                };
                observer.on_divergence(&event);
                events.push(event);
            }
        }
    }

    Ok(events)
}

/// Tail-gated scan over the newest `tail_size` positions
///
/// With `require_trend_gate`, a negative [`window_trend`] restricts the scan
/// to bullish rules, a positive one to bearish rules, and a flat window
/// yields [`Signal::Neutral`]. Without it all four rules are checked, in
/// [`DivergenceKind::ALL`] order, at each position.
///
/// # Errors
///
/// - [`DetectionError::InvalidTailSize`] when `tail_size < 1`
/// - [`DetectionError::LengthMismatch`] unless labels and `price` share one length
/// - [`DetectionError::InsufficientData`] when `tail_size` exceeds the window
pub fn classify_tail(
    price_labels: &PeakLabels,
    oscillator_labels: &PeakLabels,
    price: &[f64],
    tail_size: usize,
    require_trend_gate: bool,
) -> Result<Signal, DetectionError> {
    if tail_size < 1 {
        return Err(DetectionError::InvalidTailSize { tail_size });
    }
    check_labels(price_labels, oscillator_labels)?;
    check_len("price", price_labels.len(), price.len())?;
    if tail_size > price.len() {
        return Err(DetectionError::InsufficientData {
            needed: tail_size,
            available: price.len(),
        });
    }

    let rules: &[DivergenceKind] = if require_trend_gate {
        let trend = window_trend(price);
        if trend < 0.0 {
            &DivergenceKind::BULLISH
        } else if trend > 0.0 {
            &DivergenceKind::BEARISH
        } else {
            return Ok(Signal::Neutral);
        }
    } else {
        &DivergenceKind::ALL
    };

    let newest = price.len() - 1;
    for index in (price.len() - tail_size..=newest).rev() {
        if let Some(kind) = rules
            .iter()
            .find(|kind| kind.fires(price_labels, oscillator_labels, index))
        {
            return Ok(kind.signal());
        }
    }

    Ok(Signal::Neutral)
}

fn check_labels(price: &PeakLabels, oscillator: &PeakLabels) -> Result<(), DetectionError> {
    check_len("price lows", price.highs.len(), price.lows.len())?;
    check_len("oscillator highs", price.len(), oscillator.highs.len())?;
    check_len("oscillator lows", price.len(), oscillator.lows.len())
}
