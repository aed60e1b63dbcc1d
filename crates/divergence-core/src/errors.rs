//! Detection error types
//!
//! Every variant is a precondition failure. Checks run before any scan
//! starts, so a call either produces a complete result or none at all.

use thiserror::Error;

/// Detection errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectionError {
    #[error("Invalid order: {order}. Order must be an integer >= 1")]
    InvalidOrder { order: usize },

    #[error("Invalid run length: K = {k}. K must be >= {min}")]
    InvalidRunLength { k: usize, min: usize },

    #[error("Invalid tail size: {tail_size}. Tail size must be >= 1")]
    InvalidTailSize { tail_size: usize },

    #[error("Length mismatch for {series}: expected {expected}, got {actual}")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Insufficient data: needed {needed}, available {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("Non-finite value in {series} at index {index}")]
    NonFiniteValue { series: &'static str, index: usize },
}

/// Check `order >= 1`
pub(crate) fn check_order(order: usize) -> Result<(), DetectionError> {
    if order < 1 {
        return Err(DetectionError::InvalidOrder { order });
    }
    Ok(())
}

/// Check `k >= min`
pub(crate) fn check_run_length(k: usize, min: usize) -> Result<(), DetectionError> {
    if k < min {
        return Err(DetectionError::InvalidRunLength { k, min });
    }
    Ok(())
}

/// Check that a parallel series has the expected length
pub(crate) fn check_len(
    series: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), DetectionError> {
    if expected != actual {
        return Err(DetectionError::LengthMismatch {
            series,
            expected,
            actual,
        });
    }
    Ok(())
}
