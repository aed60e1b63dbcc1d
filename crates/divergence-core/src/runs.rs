//! Monotonic run construction over one-sided extrema
//!
//! Candidates (all maxima or all minima) are scanned in order. A run grows
//! while each candidate is strictly beyond the previous one in the run's
//! direction, and is sealed the moment it holds `k` indices. Runs are never
//! longer than `k`; a partial run left at the end of the scan is still
//! emitted, so the final run may be shorter.

use crate::errors::{check_run_length, DetectionError};
use crate::extrema::{find_side, ExtremumSide};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Run direction and side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    HigherHighs,
    LowerHighs,
    HigherLows,
    LowerLows,
}

impl RunKind {
    /// All kinds, in the order the peak labeler writes them
    pub const ALL: [RunKind; 4] = [
        RunKind::HigherHighs,
        RunKind::LowerHighs,
        RunKind::LowerLows,
        RunKind::HigherLows,
    ];

    /// Which extrema this kind is built from
    pub fn side(self) -> ExtremumSide {
        match self {
            RunKind::HigherHighs | RunKind::LowerHighs => ExtremumSide::High,
            RunKind::HigherLows | RunKind::LowerLows => ExtremumSide::Low,
        }
    }

    /// Label written for a confirmed run: +1 rising, -1 falling
    pub fn label(self) -> i8 {
        match self {
            RunKind::HigherHighs | RunKind::HigherLows => 1,
            RunKind::LowerHighs | RunKind::LowerLows => -1,
        }
    }

    /// Does `current` continue a run whose previous value is `previous`?
    #[inline]
    pub fn extends(self, previous: f64, current: f64) -> bool {
        match self {
            RunKind::HigherHighs | RunKind::HigherLows => current > previous,
            RunKind::LowerHighs | RunKind::LowerLows => current < previous,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunKind::HigherHighs => "higher_highs",
            RunKind::LowerHighs => "lower_highs",
            RunKind::HigherLows => "higher_lows",
            RunKind::LowerLows => "lower_lows",
        }
    }
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happens to the candidate that breaks a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunSeeding {
    /// The breaking candidate is discarded along with the run; the candidate
    /// after it seeds the next run. Adjacent pairs spanning a break are
    /// therefore never counted.
    #[default]
    Strict,
    /// A run restarts from the previous candidate as soon as a pair extends
    /// again, whether the last run was broken or sealed. Sealed runs can share
    /// their boundary extremum, so `[5, 3, 4, 6]` at K = 2 yields `[3, 4]`
    /// and `[4, 6]`.
    Reseed,
}

/// A group of extremum indices with a strict monotonic relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub kind: RunKind,
    /// Extremum indices in ascending order (never empty)
    pub indices: Vec<usize>,
}

impl Run {
    /// Index of the run's terminal extremum
    pub fn last(&self) -> usize {
        // Runs are only emitted with at least one index
        self.indices[self.indices.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// True when the run reached the target length
    pub fn is_complete(&self, k: usize) -> bool {
        self.indices.len() == k
    }
}

/// Accumulates the current run while candidates are scanned
struct RunAccumulator {
    kind: RunKind,
    k: usize,
    seeding: RunSeeding,
    current: Vec<usize>,
    previous: Option<(usize, f64)>,
}

impl RunAccumulator {
    fn new(kind: RunKind, k: usize, seeding: RunSeeding) -> Self {
        Self {
            kind,
            k,
            seeding,
            current: Vec::with_capacity(k),
            previous: None,
        }
    }

    /// Feed one candidate, returning a sealed run if it completed one
    fn push(&mut self, index: usize, value: f64) -> Option<Run> {
        let previous = self.previous.replace((index, value));

        match self.seeding {
            RunSeeding::Strict => {
                let extends = previous.is_some_and(|(_, prev)| self.kind.extends(prev, value));
                if self.current.is_empty() || extends {
                    self.current.push(index);
                } else {
                    self.current.clear();
                }
            }
            RunSeeding::Reseed => match previous {
                None => self.current.push(index),
                Some((prev_index, prev)) if self.kind.extends(prev, value) => {
                    if self.current.is_empty() && self.k > 1 {
                        self.current.push(prev_index);
                    }
                    self.current.push(index);
                }
                Some(_) => self.current.clear(),
            },
        }

        if self.current.len() == self.k {
            return Some(self.seal());
        }
        None
    }

    /// Emit whatever is still accumulating
    fn finish(mut self) -> Option<Run> {
        if self.current.is_empty() {
            None
        } else {
            Some(self.seal())
        }
    }

    fn seal(&mut self) -> Run {
        Run {
            kind: self.kind,
            indices: std::mem::replace(&mut self.current, Vec::with_capacity(self.k)),
        }
    }
}

/// Build runs of length `k` for one run kind
///
/// Uses [`RunSeeding::Strict`].
///
/// # Errors
///
/// [`DetectionError::InvalidOrder`] when `order < 1`,
/// [`DetectionError::InvalidRunLength`] when `k < 1`.
pub fn build_runs(
    series: &[f64],
    order: usize,
    k: usize,
    kind: RunKind,
) -> Result<Vec<Run>, DetectionError> {
    build_runs_with(series, order, k, kind, RunSeeding::Strict)
}

/// Build runs of length `k` with an explicit seeding policy
pub fn build_runs_with(
    series: &[f64],
    order: usize,
    k: usize,
    kind: RunKind,
    seeding: RunSeeding,
) -> Result<Vec<Run>, DetectionError> {
    check_run_length(k, 1)?;
    let extrema = find_side(series, order, kind.side())?;
    runs_from_extrema(series, &extrema, k, kind, seeding)
}

/// Build runs from precomputed extremum indices
///
/// `extrema` must be ascending indices into `series` for `kind.side()`.
/// Shares one extrema scan between the two kinds of a side.
pub(crate) fn runs_from_extrema(
    series: &[f64],
    extrema: &[usize],
    k: usize,
    kind: RunKind,
    seeding: RunSeeding,
) -> Result<Vec<Run>, DetectionError> {
    check_run_length(k, 1)?;

    let mut accumulator = RunAccumulator::new(kind, k, seeding);
    let mut runs = Vec::new();

    for &index in extrema {
        if let Some(run) = accumulator.push(index, series[index]) {
            runs.push(run);
        }
    }

    if let Some(trailing) = accumulator.finish() {
        runs.push(trailing);
    }

    Ok(runs)
}
