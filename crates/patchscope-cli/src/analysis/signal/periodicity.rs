//! Bounded-lag autocorrelation search.

use std::ops::RangeInclusive;

/// Shortest lag considered by the window search.
pub const MIN_LAG: usize = 40;

/// Longest lag considered by the window search.
pub const MAX_LAG: usize = 500;

/// Energy below which a lag's overlap is treated as silent.
const ENERGY_FLOOR: f64 = 1e-9;

/// Dominant periodicity of a signal segment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Periodicity {
    /// Lag in frames, 0 when no lag correlated positively.
    pub lag: usize,
    /// Normalized correlation at `lag`.
    pub autocorr: f64,
}

impl Periodicity {
    /// `sample_rate / lag`, or 0 when there is no lag.
    pub fn frequency_hz(&self, sample_rate: u32) -> f64 {
        if self.lag == 0 {
            0.0
        } else {
            sample_rate as f64 / self.lag as f64
        }
    }
}

/// Searches lags `[MIN_LAG, min(MAX_LAG, n - 2)]` of a measurement window.
///
/// Windows of `MIN_LAG + 2` samples or fewer are not searched.
pub(super) fn dominant_lag(samples: &[f32]) -> Periodicity {
    let n = samples.len();
    if n <= MIN_LAG + 2 {
        return Periodicity::default();
    }
    search_lags(samples, MIN_LAG..=MAX_LAG.min(n - 2), ENERGY_FLOOR)
}

/// Finds the lag in `lags` with the highest normalized autocorrelation.
///
/// Lags whose overlapping energy on either side is below `energy_floor` are
/// skipped. The maximum starts at zero and only a strictly greater value
/// replaces it, so ties keep the lower lag and non-positive correlations are
/// never reported.
pub(crate) fn search_lags(
    samples: &[f32],
    lags: RangeInclusive<usize>,
    energy_floor: f64,
) -> Periodicity {
    let mut best = Periodicity::default();

    for lag in lags {
        if lag >= samples.len() {
            break;
        }

        let mut acc = 0.0f64;
        let mut e1 = 0.0f64;
        let mut e2 = 0.0f64;
        for i in lag..samples.len() {
            let x = samples[i] as f64;
            let y = samples[i - lag] as f64;
            acc += x * y;
            e1 += x * x;
            e2 += y * y;
        }

        if e1 < energy_floor || e2 < energy_floor {
            continue;
        }

        let r = acc / (e1 * e2).sqrt();
        if r > best.autocorr {
            best = Periodicity { lag, autocorr: r };
        }
    }

    best
}
