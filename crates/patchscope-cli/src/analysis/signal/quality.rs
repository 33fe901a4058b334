//! Level calculations for signal analysis.

/// Calculate peak amplitude.
pub(crate) fn calculate_peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0f32, |max, s| max.max(s))
}

/// Calculate mean absolute amplitude.
pub(crate) fn calculate_absmean(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| (s as f64).abs()).sum();
    sum / samples.len() as f64
}
