//! Append-only sample capture.

/// Ordered sequence of every captured sample.
///
/// Only the controller appends; consumers get read-only access or take the
/// samples by value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleStream {
    samples: Vec<f32>,
}

impl SampleStream {
    /// Creates an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, block: &[f32]) {
        self.samples.extend_from_slice(block);
    }

    /// Captured samples.
    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    /// Number of captured samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Takes the samples.
    pub fn into_vec(self) -> Vec<f32> {
        self.samples
    }
}

impl From<Vec<f32>> for SampleStream {
    fn from(samples: Vec<f32>) -> Self {
        Self { samples }
    }
}

/// Root-mean-square of one block: `sqrt(sum(s^2) / max(1, n))`.
pub fn block_rms(samples: &[f32]) -> f32 {
    let sum_of_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_of_squares / samples.len().max(1) as f64).sqrt() as f32
}
