//! Temporal metric calculations for signal analysis.

/// Calculate zero crossing rate.
///
/// A crossing is counted whenever two neighbouring samples fall on different
/// sides of zero, with zero itself counted as non-negative.
pub(crate) fn calculate_zero_crossing_rate(samples: &[f32]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }

    let crossings: usize = samples
        .windows(2)
        .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
        .count();

    crossings as f64 / (samples.len() - 1) as f64
}
