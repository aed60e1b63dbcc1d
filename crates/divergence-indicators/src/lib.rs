//! Momentum oscillators for divergence detection
//!
//! The detector compares price against an oscillator that shares its index
//! space. This crate provides that oscillator: a Wilder-smoothed RSI in both
//! streaming ([`Rsi`]) and batch ([`rsi`]) form, plus the [`Oscillator`]
//! trait the pipeline is written against.

pub mod rsi;

pub use rsi::{rsi, IndicatorError, Oscillator, Rsi, RsiOscillator};
