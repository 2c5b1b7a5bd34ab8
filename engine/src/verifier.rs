use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::element::{Element, ElementKind, Value};
use crate::wire::{element_count, ensure_len, read_elements_le, reference_len};
use crate::{EngineError, EngineResult};

/// How reference and simulator output are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    /// Byte-exact comparison of the whole streams, no diagnostics
    Strict,
    /// Element-by-element comparison reporting every differing index
    Element,
}

impl FromStr for CompareMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" | "bytes" => Ok(CompareMode::Strict),
            "element" | "elements" => Ok(CompareMode::Element),
            other => Err(format!("unknown compare mode '{}' (expected strict or element)", other)),
        }
    }
}

impl fmt::Display for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareMode::Strict => f.write_str("strict"),
            CompareMode::Element => f.write_str("element"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
}

/// One differing element, `index` counted row-major from 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mismatch {
    pub index: usize,
    pub expected: Value,
    pub actual: Value,
}

impl Mismatch {
    pub fn row(&self, n: usize) -> usize {
        self.index / n
    }

    pub fn col(&self, n: usize) -> usize {
        self.index % n
    }

    /// Absolute numeric distance between the two sides
    pub fn abs_diff(&self) -> f64 {
        (self.expected.as_f64() - self.actual.as_f64()).abs()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub mode: CompareMode,
    pub verdict: Verdict,
    /// Always empty in strict mode
    pub mismatches: Vec<Mismatch>,
}

impl VerificationResult {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// Re-judge the reported mismatches against a caller-chosen absolute
    /// tolerance. Strict-mode failures carry no pairs and never pass here.
    pub fn within_tolerance(&self, tolerance: f64) -> bool {
        match self.verdict {
            Verdict::Pass => true,
            Verdict::Fail if self.mode == CompareMode::Strict => false,
            Verdict::Fail => self.mismatches.iter().all(|m| m.abs_diff() <= tolerance),
        }
    }
}

/// Compare a reference stream with the simulator's output.
///
/// Strict mode only requires both streams to be element-aligned; a length
/// difference is an ordinary failure. Element mode requires both to hold
/// exactly n² elements and fails with a format error before comparing
/// anything otherwise. An empty array (n = 0) is a shape error in both modes.
pub fn verify(
    expected: &[u8],
    actual: &[u8],
    n: usize,
    kind: ElementKind,
    mode: CompareMode,
) -> EngineResult<VerificationResult> {
    if n == 0 {
        return Err(EngineError::InvalidShape {
            expected: "array size of at least 1".to_string(),
            actual: "n = 0".to_string(),
        });
    }

    let result = match mode {
        CompareMode::Strict => {
            element_count(expected, kind, "expected")?;
            element_count(actual, kind, "actual")?;
            let verdict = if expected == actual {
                Verdict::Pass
            } else {
                Verdict::Fail
            };
            VerificationResult {
                mode,
                verdict,
                mismatches: Vec::new(),
            }
        }
        CompareMode::Element => {
            element_count(expected, kind, "expected")?;
            element_count(actual, kind, "actual")?;
            let len = reference_len(n, kind);
            ensure_len(expected, len, "expected")?;
            ensure_len(actual, len, "actual")?;

            let mismatches = match kind {
                ElementKind::Int32 => compare_elements::<i32>(expected, actual)?,
                ElementKind::Float32 => compare_elements::<f32>(expected, actual)?,
            };
            let verdict = if mismatches.is_empty() {
                Verdict::Pass
            } else {
                Verdict::Fail
            };
            VerificationResult {
                mode,
                verdict,
                mismatches,
            }
        }
    };

    debug!(
        ?mode,
        n,
        kind = kind.name(),
        verdict = ?result.verdict,
        mismatches = result.mismatches.len(),
        "verified streams"
    );
    Ok(result)
}

fn compare_elements<T: Element>(expected: &[u8], actual: &[u8]) -> EngineResult<Vec<Mismatch>> {
    let expected = read_elements_le::<T>(expected, "expected")?;
    let actual = read_elements_le::<T>(actual, "actual")?;

    Ok(expected
        .into_iter()
        .zip(actual)
        .enumerate()
        .map(|(index, (e, a))| Mismatch {
            index,
            expected: e.to_value(),
            actual: a.to_value(),
        })
        .filter(|m| m.expected != m.actual)
        .collect())
}
