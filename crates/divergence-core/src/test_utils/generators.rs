//! Deterministic series generators for integration tests and benches
//!
//! All functions are pure: no randomness, no I/O.

use std::f64::consts::PI;

/// Sine wave with linear drift
///
/// `value[i] = base + drift * i + amplitude * sin(2πi / period)`
pub fn sine_wave(len: usize, base: f64, amplitude: f64, period: f64, drift: f64) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let x = i as f64;
            base + drift * x + amplitude * (2.0 * PI * x / period).sin()
        })
        .collect()
}

/// Alternating peaks and troughs, one bar each
///
/// Even positions are peaks, odd positions are troughs. Peaks move by
/// `peak_step` and troughs by `trough_step` per cycle, so with `order = 1`
/// every interior peak is a maximum and every trough a minimum.
pub fn zigzag(len: usize, peak: f64, peak_step: f64, trough: f64, trough_step: f64) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let cycle = (i / 2) as f64;
            if i % 2 == 0 {
                peak + peak_step * cycle
            } else {
                trough + trough_step * cycle
            }
        })
        .collect()
}

/// Price making lower lows against an oscillator making higher lows
///
/// Returns `(price, oscillator)` of equal length. With `order = 1, k = 2`
/// the falling price troughs at 1, 3 and rising oscillator troughs at the
/// same positions confirm together at index 4.
pub fn regular_bullish_pair() -> (Vec<f64>, Vec<f64>) {
    let price = vec![110.0, 100.0, 110.0, 95.0, 110.0, 111.0];
    let oscillator = vec![50.0, 30.0, 50.0, 35.0, 50.0, 51.0];
    (price, oscillator)
}

/// Price making higher highs against an oscillator making lower highs
///
/// Mirror of [`regular_bullish_pair`]: confirms a regular bearish
/// divergence at index 4 with `order = 1, k = 2`.
pub fn regular_bearish_pair() -> (Vec<f64>, Vec<f64>) {
    let price = vec![90.0, 100.0, 90.0, 105.0, 90.0, 89.0];
    let oscillator = vec![50.0, 70.0, 50.0, 65.0, 50.0, 49.0];
    (price, oscillator)
}
