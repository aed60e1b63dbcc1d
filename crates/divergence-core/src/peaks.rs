//! Peak labeling
//!
//! Turns the four run sets of a series into two dense label arrays, `highs`
//! and `lows`, indexed like the series. A run's label (+1 rising, -1 falling)
//! is written at the bar where its last extremum is confirmed, `order` bars
//! after the extremum itself.
//!
//! Write order is higher highs, lower highs, lower lows, higher lows; when two
//! runs land on the same index the later write wins and the overwrite is
//! counted in [`PeakLabels::collisions`]. Runs confirmed past the end of the
//! window are skipped and counted in [`PeakLabels::dropped`].

use crate::errors::{check_order, check_run_length, DetectionError};
use crate::extrema::{find_side, ExtremumSide};
use crate::observer::{DetectionObserver, NoopObserver};
use crate::runs::{runs_from_extrema, Run, RunKind, RunSeeding};
use crate::window::AlignedWindow;
use serde::{Deserialize, Serialize};

/// Extrema and runs found in one series
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeriesStructure {
    pub maxima: Vec<usize>,
    pub minima: Vec<usize>,
    pub higher_highs: Vec<Run>,
    pub lower_highs: Vec<Run>,
    pub higher_lows: Vec<Run>,
    pub lower_lows: Vec<Run>,
}

impl SeriesStructure {
    /// Locate extrema once per side and build all four run kinds from them
    pub fn scan(
        window: AlignedWindow<'_>,
        order: usize,
        k: usize,
        seeding: RunSeeding,
        series: &str,
        observer: &dyn DetectionObserver,
    ) -> Result<Self, DetectionError> {
        check_order(order)?;
        check_run_length(k, 1)?;

        let values = window.values();
        let maxima = find_side(values, order, ExtremumSide::High)?;
        let minima = find_side(values, order, ExtremumSide::Low)?;
        observer.on_extrema(series, ExtremumSide::High, &maxima);
        observer.on_extrema(series, ExtremumSide::Low, &minima);

        let mut structure = Self {
            maxima,
            minima,
            ..Self::default()
        };

        for kind in RunKind::ALL {
            let extrema = match kind.side() {
                ExtremumSide::High => &structure.maxima,
                ExtremumSide::Low => &structure.minima,
            };
            let runs = runs_from_extrema(values, extrema, k, kind, seeding)?;
            observer.on_runs(series, kind, &runs);
            *structure.runs_mut(kind) = runs;
        }

        Ok(structure)
    }

    pub fn runs(&self, kind: RunKind) -> &[Run] {
        match kind {
            RunKind::HigherHighs => &self.higher_highs,
            RunKind::LowerHighs => &self.lower_highs,
            RunKind::HigherLows => &self.higher_lows,
            RunKind::LowerLows => &self.lower_lows,
        }
    }

    fn runs_mut(&mut self, kind: RunKind) -> &mut Vec<Run> {
        match kind {
            RunKind::HigherHighs => &mut self.higher_highs,
            RunKind::LowerHighs => &mut self.lower_highs,
            RunKind::HigherLows => &mut self.higher_lows,
            RunKind::LowerLows => &mut self.lower_lows,
        }
    }
}

/// Signed labels for one series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakLabels {
    /// +1 higher high, -1 lower high, 0 unlabeled
    pub highs: Vec<i8>,
    /// +1 higher low, -1 lower low, 0 unlabeled
    pub lows: Vec<i8>,
    /// Runs whose confirmation index fell outside the series
    pub dropped: usize,
    /// Writes that replaced an existing non-zero label
    pub collisions: usize,
}

impl PeakLabels {
    /// All-zero labels for a series of `len` values
    pub fn zeroed(len: usize) -> Self {
        Self {
            highs: vec![0; len],
            lows: vec![0; len],
            dropped: 0,
            collisions: 0,
        }
    }

    /// Write labels for every run in `structure`
    pub fn from_structure(
        window: AlignedWindow<'_>,
        order: usize,
        structure: &SeriesStructure,
        series: &str,
        observer: &dyn DetectionObserver,
    ) -> Self {
        let mut labels = Self::zeroed(window.len());

        for kind in RunKind::ALL {
            for run in structure.runs(kind) {
                match window.confirmation_index(run.last(), order) {
                    Some(index) => labels.write(kind, index, series, observer),
                    None => {
                        labels.dropped += 1;
                        observer.on_label_dropped(series, run, run.last().saturating_add(order));
                    }
                }
            }
        }

        labels
    }

    fn write(&mut self, kind: RunKind, index: usize, series: &str, observer: &dyn DetectionObserver) {
        let label = kind.label();
        let slot = match kind.side() {
            ExtremumSide::High => &mut self.highs[index],
            ExtremumSide::Low => &mut self.lows[index],
        };

        if *slot != 0 {
            self.collisions += 1;
            observer.on_label_collision(series, index, *slot, label);
        }
        *slot = label;
    }

    pub fn len(&self) -> usize {
        self.highs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highs.is_empty()
    }

    /// Positions carrying any non-zero label
    pub fn labeled_indices(&self) -> Vec<usize> {
        self.highs
            .iter()
            .zip(&self.lows)
            .enumerate()
            .filter(|(_, (h, l))| **h != 0 || **l != 0)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Label a plain series (offset 0, strict seeding, no diagnostics)
pub fn label_peaks(series: &[f64], order: usize, k: usize) -> Result<PeakLabels, DetectionError> {
    label_window(AlignedWindow::new(series, 0), order, k, RunSeeding::Strict)
}

/// Label an aligned window
pub fn label_window(
    window: AlignedWindow<'_>,
    order: usize,
    k: usize,
    seeding: RunSeeding,
) -> Result<PeakLabels, DetectionError> {
    let structure = SeriesStructure::scan(window, order, k, seeding, "series", &NoopObserver)?;
    Ok(PeakLabels::from_structure(
        window,
        order,
        &structure,
        "series",
        &NoopObserver,
    ))
}
