//! Measurement window selection.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Subrange of a capture, in whole blocks, that aggregate metrics cover.
///
/// Bounds are clamped to what was actually captured, so a truncated render
/// yields a shorter (possibly empty) window rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum MeasurementWindow {
    /// The final `blocks` blocks of the capture.
    Tail { blocks: usize },
    /// Blocks `start..end`.
    Blocks { start: usize, end: usize },
}

impl MeasurementWindow {
    /// Window over the final `blocks` blocks.
    pub fn tail(blocks: usize) -> Self {
        Self::Tail { blocks }
    }

    /// Window over blocks `start..end`.
    pub fn blocks(start: usize, end: usize) -> Self {
        Self::Blocks { start, end }
    }

    /// Block indices covered when `available` blocks were captured.
    pub fn block_span(&self, available: usize) -> Range<usize> {
        match *self {
            Self::Tail { blocks } => available.saturating_sub(blocks)..available,
            Self::Blocks { start, end } => {
                let end = end.min(available);
                start.min(end)..end
            }
        }
    }

    /// Sample indices covered in a capture of `total_samples` samples cut
    /// into blocks of `frame_size` frames.
    pub fn sample_range(&self, frame_size: usize, total_samples: usize) -> Range<usize> {
        if frame_size == 0 {
            return 0..0;
        }
        let available = total_samples.div_ceil(frame_size);
        let span = self.block_span(available);
        let end = (span.end * frame_size).min(total_samples);
        let start = (span.start * frame_size).min(end);
        start..end
    }

    /// Whether block `index` falls inside the window.
    pub fn contains_block(&self, index: usize, available: usize) -> bool {
        self.block_span(available).contains(&index)
    }
}
