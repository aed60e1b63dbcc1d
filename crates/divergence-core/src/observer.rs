//! Injected diagnostics for detection runs
//!
//! The detection pipeline never logs on its own. Callers that want visibility
//! pass a [`DetectionObserver`]; every hook defaults to a no-op, so an
//! implementation only overrides what it cares about.

use crate::classifier::DivergenceEvent;
use crate::extrema::ExtremumSide;
use crate::runs::{Run, RunKind};

/// Receives intermediate results from a detection call
///
/// `series` names the input being processed (`"price"` or `"oscillator"`
/// when driven by [`DivergenceDetector`](crate::DivergenceDetector)).
pub trait DetectionObserver: Send + Sync {
    /// Extremum indices found for one side of a series
    fn on_extrema(&self, _series: &str, _side: ExtremumSide, _indices: &[usize]) {}

    /// Runs built for one kind
    fn on_runs(&self, _series: &str, _kind: RunKind, _runs: &[Run]) {}

    /// A run whose confirmation index fell past the end of the window
    fn on_label_dropped(&self, _series: &str, _run: &Run, _confirmation_index: usize) {}

    /// A label write that replaced an existing non-zero label
    fn on_label_collision(&self, _series: &str, _index: usize, _previous: i8, _label: i8) {}

    /// A classified divergence
    fn on_divergence(&self, _event: &DivergenceEvent) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DetectionObserver for NoopObserver {}

/// Observer that forwards every hook to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DetectionObserver for TracingObserver {
    fn on_extrema(&self, series: &str, side: ExtremumSide, indices: &[usize]) {
        tracing::trace!(series, ?side, count = indices.len(), ?indices, "extrema located");
    }

    fn on_runs(&self, series: &str, kind: RunKind, runs: &[Run]) {
        let groups: Vec<&[usize]> = runs.iter().map(|r| r.indices.as_slice()).collect();
        tracing::debug!(series, %kind, count = runs.len(), ?groups, "runs built");
    }

    fn on_label_dropped(&self, series: &str, run: &Run, confirmation_index: usize) {
        tracing::debug!(
            series,
            kind = %run.kind,
            last = run.last(),
            confirmation_index,
            "label dropped past window end"
        );
    }

    fn on_label_collision(&self, series: &str, index: usize, previous: i8, label: i8) {
        tracing::debug!(series, index, previous, label, "label overwritten");
    }

    fn on_divergence(&self, event: &DivergenceEvent) {
        tracing::debug!(
            kind = %event.kind,
            index = event.index,
            absolute_index = event.absolute_index,
            time = ?event.time,
            "divergence"
        );
    }
}
