//! Determinism checks for rendered output.
//!
//! A render is reproducible when the same preset, plan and seed give the same
//! bytes every time. [`verify_determinism`] runs a producer several times and
//! reports the first place two runs disagree.
//!
//! ```rust,ignore
//! use patchscope_tests::determinism::verify_determinism;
//!
//! let result = verify_determinism(|| render_wav(PRESET), 3);
//! result.assert_deterministic();
//! ```

use std::fmt;

/// Outcome of a determinism check.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether every run produced the first run's bytes.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// Size of the first run's output in bytes.
    pub output_size: usize,
    /// BLAKE3 hash of the first run's output.
    pub hash: String,
    /// First disagreement, if any.
    pub diff_info: Option<DiffInfo>,
}

/// Where a later run first disagreed with the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffInfo {
    /// Byte offset of the first difference (the shorter length when only the
    /// sizes differ).
    pub offset: usize,
    /// Byte of the first run, if it has one at `offset`.
    pub expected: Option<u8>,
    /// Byte of the differing run, if it has one at `offset`.
    pub actual: Option<u8>,
    /// Zero-based index of the differing run.
    pub run_index: usize,
}

impl fmt::Display for DiffInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte = |b: Option<u8>| b.map_or_else(|| "EOF".to_string(), |b| format!("0x{:02X}", b));
        write!(
            f,
            "run {} differs at byte {}: expected {}, got {}",
            self.run_index,
            self.offset,
            byte(self.expected),
            byte(self.actual)
        )
    }
}

impl DeterminismResult {
    /// Panics with the first difference if the runs disagreed.
    pub fn assert_deterministic(&self) {
        if let Some(diff) = &self.diff_info {
            panic!(
                "Non-deterministic output after {} runs ({} bytes, hash {}): {}",
                self.runs, self.output_size, self.hash, diff
            );
        }
    }
}

/// Runs `produce` `runs` times (at least 2) and compares every output with
/// the first.
pub fn verify_determinism<F, O>(produce: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> O,
    O: AsRef<[u8]>,
{
    assert!(runs >= 2, "Must run at least 2 times to verify determinism");

    let reference = produce();
    let reference = reference.as_ref();
    let hash = blake3::hash(reference).to_hex().to_string();

    let diff_info = (1..runs).find_map(|run_index| {
        let output = produce();
        first_difference(reference, output.as_ref(), run_index)
    });

    DeterminismResult {
        is_deterministic: diff_info.is_none(),
        runs,
        output_size: reference.len(),
        hash,
        diff_info,
    }
}

fn first_difference(expected: &[u8], actual: &[u8], run_index: usize) -> Option<DiffInfo> {
    let offset = expected
        .iter()
        .zip(actual)
        .position(|(e, a)| e != a)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))?;

    Some(DiffInfo {
        offset,
        expected: expected.get(offset).copied(),
        actual: actual.get(offset).copied(),
        run_index,
    })
}
