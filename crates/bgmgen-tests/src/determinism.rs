//! Byte-level determinism checks.
//!
//! Rendering must be a pure function of the track and seed. These helpers
//! run a render several times and report the first byte where two runs
//! disagree.

use std::fmt;

/// Outcome of a determinism check.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether every run produced identical output.
    pub is_deterministic: bool,
    pub runs: usize,
    /// Size of the first run's output in bytes.
    pub output_size: usize,
    /// BLAKE3 hash of the first run's output.
    pub hash: String,
    /// The first difference found, if any.
    pub diff_info: Option<DiffInfo>,
}

/// First byte at which a run diverged from the reference.
///
/// A byte is `None` when that output ended before `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffInfo {
    pub offset: usize,
    pub expected: Option<u8>,
    pub actual: Option<u8>,
    /// Which run (0-indexed) diverged.
    pub run_index: usize,
}

fn fmt_byte(byte: Option<u8>) -> String {
    match byte {
        Some(b) => format!("0x{:02X}", b),
        None => "EOF".to_string(),
    }
}

impl fmt::Display for DiffInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "difference at byte {}: expected {}, got {} (run {})",
            self.offset,
            fmt_byte(self.expected),
            fmt_byte(self.actual),
            self.run_index
        )
    }
}

impl DeterminismResult {
    /// Panics with the first difference if the runs disagreed.
    pub fn assert_deterministic(&self) {
        if let Some(diff) = &self.diff_info {
            panic!(
                "non-deterministic output after {} runs ({} bytes, hash {}): {}",
                self.runs, self.output_size, self.hash, diff
            );
        }
    }
}

/// Finds the first differing byte between two outputs.
pub fn first_difference(expected: &[u8], actual: &[u8], run_index: usize) -> Option<DiffInfo> {
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

/// Runs `generate_fn` `runs` times and compares every output to the first.
///
/// # Example
///
/// ```
/// use bgmgen_tests::verify_determinism;
///
/// let result = verify_determinism(|| vec![1u8, 2, 3], 3);
/// assert!(result.is_deterministic);
/// ```
pub fn verify_determinism<F, O>(generate_fn: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> O,
    O: AsRef<[u8]>,
{
    assert!(runs >= 2, "Must run at least 2 times to verify determinism");

    let reference = generate_fn();
    let reference_bytes = reference.as_ref();
    let hash = blake3::hash(reference_bytes).to_hex().to_string();

    let diff_info = (1..runs).find_map(|run_index| {
        let output = generate_fn();
        first_difference(reference_bytes, output.as_ref(), run_index)
    });

    DeterminismResult {
        is_deterministic: diff_info.is_none(),
        runs,
        output_size: reference_bytes.len(),
        hash,
        diff_info,
    }
}
