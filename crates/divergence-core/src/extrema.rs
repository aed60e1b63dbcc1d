//! Local extrema detection
//!
//! An index `i` is an extremum when no neighbour within `[i - order, i + order]`
//! dominates `series[i]`. Only interior positions
//! `order <= i < len - order` are tested; boundary positions never qualify.
//!
//! Equal neighbours never dominate, so a flat plateau is reported as both a
//! maximum and a minimum.

use crate::errors::{check_order, DetectionError};
use serde::{Deserialize, Serialize};

/// Which side of the series an extremum sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtremumSide {
    /// Local maxima (no neighbour is greater)
    High,
    /// Local minima (no neighbour is lesser)
    Low,
}

impl ExtremumSide {
    /// Returns true when neighbour `b` disqualifies centre `a`
    #[inline]
    pub fn is_dominant(self, a: f64, b: f64) -> bool {
        match self {
            ExtremumSide::High => a < b,
            ExtremumSide::Low => a > b,
        }
    }
}

/// Find extremum indices with a caller-supplied dominance predicate
///
/// `is_dominant(series[i], series[j])` returning true for any neighbour `j`
/// rules `i` out. Indices come back in ascending order.
///
/// # Errors
///
/// [`DetectionError::InvalidOrder`] when `order < 1`.
///
/// A series shorter than `2 * order + 1` has no interior positions and yields
/// an empty result.
pub fn find_extrema<F>(
    series: &[f64],
    order: usize,
    is_dominant: F,
) -> Result<Vec<usize>, DetectionError>
where
    F: Fn(f64, f64) -> bool,
{
    check_order(order)?;

    let len = series.len();
    let end = len.saturating_sub(order);
    let mut indices = Vec::new();

    for i in order..end {
        let centre = series[i];
        let window = &series[i - order..=i + order];
        let dominated = window
            .iter()
            .enumerate()
            .any(|(offset, &neighbour)| offset != order && is_dominant(centre, neighbour));

        if !dominated {
            indices.push(i);
        }
    }

    Ok(indices)
}

/// Find local maxima (`a < b` dominance)
pub fn find_maxima(series: &[f64], order: usize) -> Result<Vec<usize>, DetectionError> {
    find_side(series, order, ExtremumSide::High)
}

/// Find local minima (`a > b` dominance)
pub fn find_minima(series: &[f64], order: usize) -> Result<Vec<usize>, DetectionError> {
    find_side(series, order, ExtremumSide::Low)
}

/// Find extrema for one side of the series
pub fn find_side(
    series: &[f64],
    order: usize,
    side: ExtremumSide,
) -> Result<Vec<usize>, DetectionError> {
    find_extrema(series, order, |a, b| side.is_dominant(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag_maxima() {
        let series = [1.0, 3.0, 1.0, 5.0, 1.0, 7.0, 1.0, 9.0, 1.0];
        assert_eq!(find_maxima(&series, 1).unwrap(), vec![1, 3, 5, 7]);
        assert_eq!(find_minima(&series, 1).unwrap(), vec![2, 4, 6]);
    }

    #[test]
    fn test_higher_order_filters_minor_swings() {
        let series = [5.0, 4.0, 3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(find_minima(&series, 2).unwrap(), vec![4]);
        assert!(find_maxima(&series, 2).unwrap().is_empty());
    }

    #[test]
    fn test_series_too_short_for_order() {
        let series = [1.0, 2.0, 3.0, 2.0, 1.0];
        assert!(find_maxima(&series, 3).unwrap().is_empty());
        assert!(find_minima(&series, 3).unwrap().is_empty());
        assert!(find_maxima(&[], 1).unwrap().is_empty());
    }

    #[test]
    fn test_order_far_larger_than_series() {
        let series = [1.0, 2.0, 1.0];
        assert!(find_maxima(&series, usize::MAX / 2).unwrap().is_empty());
    }

    #[test]
    fn test_zero_order_rejected() {
        let err = find_maxima(&[1.0, 2.0, 1.0], 0).unwrap_err();
        assert_eq!(err, DetectionError::InvalidOrder { order: 0 });
    }

    #[test]
    fn test_plateau_is_both_max_and_min() {
        let series = [2.0, 2.0, 2.0, 2.0, 2.0];
        assert_eq!(find_maxima(&series, 1).unwrap(), vec![1, 2, 3]);
        assert_eq!(find_minima(&series, 1).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_boundaries_never_reported() {
        // Largest value sits at the edge; it must not be returned
        let series = [9.0, 1.0, 2.0, 1.0, 9.0];
        let maxima = find_maxima(&series, 1).unwrap();
        assert_eq!(maxima, vec![2]);
    }

    #[test]
    fn test_custom_predicate() {
        let series = [1.0, 3.0, 1.0, 5.0, 1.0];
        let via_closure = find_extrema(&series, 1, |a, b| a < b).unwrap();
        assert_eq!(via_closure, find_maxima(&series, 1).unwrap());
    }

    #[test]
    fn test_idempotent() {
        let series = [1.0, 4.0, 2.0, 6.0, 3.0, 5.0, 1.0];
        let first = find_maxima(&series, 1).unwrap();
        let second = find_maxima(&series, 1).unwrap();
        assert_eq!(first, second);
    }
}
