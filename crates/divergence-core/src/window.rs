//! Explicit index alignment between price, oscillator and time
//!
//! An oscillator such as RSI has no value for its first `period` bars, so the
//! price series has to be cropped to match it. [`AlignedSeries`] does that
//! cropping once and records the offset into the original history, and
//! [`AlignedWindow`] owns the `extremum + order` confirmation arithmetic.

use crate::errors::{check_len, DetectionError};
use chrono::{DateTime, Utc};

/// Read-only view of one series plus its offset into the original history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedWindow<'a> {
    values: &'a [f64],
    start_offset: usize,
}

impl<'a> AlignedWindow<'a> {
    pub fn new(values: &'a [f64], start_offset: usize) -> Self {
        Self {
            values,
            start_offset,
        }
    }

    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Window position at which an extremum becomes confirmed
    ///
    /// An extremum at `i` can only be known once `order` further bars have
    /// printed, so its label lands on `i + order`. Returns `None` when that
    /// position is past the end of the window.
    pub fn confirmation_index(&self, extremum_index: usize, order: usize) -> Option<usize> {
        extremum_index
            .checked_add(order)
            .filter(|&index| index < self.values.len())
    }

    /// Position in the original (uncropped) history
    pub fn absolute_index(&self, index: usize) -> usize {
        self.start_offset + index
    }
}

/// Price, oscillator and timestamps sharing one index space
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    price: Vec<f64>,
    oscillator: Vec<f64>,
    dates: Vec<DateTime<Utc>>,
    start_offset: usize,
}

impl AlignedSeries {
    /// Build from already aligned series
    ///
    /// # Errors
    ///
    /// - [`DetectionError::LengthMismatch`] if the three series differ in length
    /// - [`DetectionError::NonFiniteValue`] on NaN or infinite price/oscillator values
    pub fn new(
        price: Vec<f64>,
        oscillator: Vec<f64>,
        dates: Vec<DateTime<Utc>>,
        start_offset: usize,
    ) -> Result<Self, DetectionError> {
        check_len("oscillator", price.len(), oscillator.len())?;
        check_len("dates", price.len(), dates.len())?;
        check_finite("price", &price)?;
        check_finite("oscillator", &oscillator)?;

        Ok(Self {
            price,
            oscillator,
            dates,
            start_offset,
        })
    }

    /// Tail-align a shorter oscillator against the full price history
    ///
    /// The oscillator's last value is taken to belong to the last price bar.
    /// Leading price bars without an oscillator value are dropped and counted
    /// in the start offset.
    pub fn align(
        price: &[f64],
        dates: &[DateTime<Utc>],
        oscillator: &[f64],
    ) -> Result<Self, DetectionError> {
        check_len("dates", price.len(), dates.len())?;
        if oscillator.len() > price.len() {
            return Err(DetectionError::LengthMismatch {
                series: "oscillator",
                expected: price.len(),
                actual: oscillator.len(),
            });
        }

        let start_offset = price.len() - oscillator.len();
        Self::new(
            price[start_offset..].to_vec(),
            oscillator.to_vec(),
            dates[start_offset..].to_vec(),
            start_offset,
        )
    }

    /// Keep only the most recent `len` positions
    ///
    /// # Errors
    ///
    /// [`DetectionError::InsufficientData`] if fewer than `len` positions exist.
    pub fn tail(&self, len: usize) -> Result<Self, DetectionError> {
        if len > self.len() {
            return Err(DetectionError::InsufficientData {
                needed: len,
                available: self.len(),
            });
        }

        let skip = self.len() - len;
        Ok(Self {
            price: self.price[skip..].to_vec(),
            oscillator: self.oscillator[skip..].to_vec(),
            dates: self.dates[skip..].to_vec(),
            start_offset: self.start_offset + skip,
        })
    }

    /// Shift the start offset by `base` positions
    ///
    /// Used when the aligned data was itself cut from a longer history.
    pub fn offset_by(mut self, base: usize) -> Self {
        self.start_offset += base;
        self
    }

    pub fn price(&self) -> &[f64] {
        &self.price
    }

    pub fn oscillator(&self) -> &[f64] {
        &self.oscillator
    }

    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.dates
    }

    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    pub fn len(&self) -> usize {
        self.price.len()
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_empty()
    }

    pub fn price_window(&self) -> AlignedWindow<'_> {
        AlignedWindow::new(&self.price, self.start_offset)
    }

    pub fn oscillator_window(&self) -> AlignedWindow<'_> {
        AlignedWindow::new(&self.oscillator, self.start_offset)
    }
}

fn check_finite(series: &'static str, values: &[f64]) -> Result<(), DetectionError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(DetectionError::NonFiniteValue { series, index }),
        None => Ok(()),
    }
}
