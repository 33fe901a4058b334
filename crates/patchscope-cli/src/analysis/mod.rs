//! Analysis of rendered audio.
//!
//! All outputs are deterministic: the same samples always produce
//! byte-identical records.
//!
//! ## Modules
//!
//! - [`signal`]: per-capture metrics over a measurement window
//! - [`comparison`]: block-by-block comparison of a candidate render against a
//!   reference render

pub mod comparison;
pub mod signal;

/// Round a float to the specified number of decimal places.
pub(crate) fn round_f64(value: f64, decimals: i32) -> f64 {
    let multiplier = 10_f64.powi(decimals);
    (value * multiplier).round() / multiplier
}
