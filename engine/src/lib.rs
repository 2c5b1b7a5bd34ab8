use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod element;
pub mod encoder;
pub mod matrix;
pub mod skew;
pub mod verifier;
pub mod wire;

pub use element::{Element, ElementKind, Value};
pub use encoder::{
    decode_wire_frame, encode, encode_matrices, encode_to, reference_product, EncodedStreams,
};
pub use matrix::{Matrix, MatrixPair};
pub use skew::{skew_columns, skew_rows, SkewedGrid};
pub use verifier::{verify, CompareMode, Mismatch, VerificationResult, Verdict};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid matrix shape: expected {expected}, got {actual}")]
    InvalidShape { expected: String, actual: String },
    #[error("Unsupported element kind: {0}")]
    UnsupportedKind(String),
    #[error("Malformed {stream} stream: {reason}")]
    MalformedStream { stream: &'static str, reason: String },
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Configuration for one encode/verify cycle
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Side length of the square operands (the array is n×n)
    pub n: usize,
    /// Numeric element type shared by both operands
    pub kind: ElementKind,
    /// How the verifier compares reference and simulator output
    pub mode: CompareMode,
    /// Random seed for deterministic matrix generation
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            n: 4,
            kind: ElementKind::Int32,
            mode: CompareMode::Strict,
            seed: 42,
        }
    }
}

impl EngineConfig {
    pub fn demo() -> Self {
        Self::default()
    }

    /// Byte length of the wire frame produced under this configuration
    pub fn frame_len(&self) -> usize {
        wire::frame_len(self.n, self.kind)
    }

    /// Byte length of the reference (and simulator output) stream
    pub fn reference_len(&self) -> usize {
        wire::reference_len(self.n, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_four_by_four_array() {
        let config = EngineConfig::default();
        assert_eq!(config.n, 4);
        assert_eq!(config.kind, ElementKind::Int32);
        assert_eq!(config.frame_len(), 8 * 8 * 4);
        assert_eq!(config.reference_len(), 16 * 4);
    }

    #[test]
    fn test_error_messages() {
        let err = EngineError::InvalidShape {
            expected: "square matrix".to_string(),
            actual: "row 1 has 3 columns".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid matrix shape: expected square matrix, got row 1 has 3 columns"
        );

        let err = EngineError::UnsupportedKind("int16".to_string());
        assert_eq!(err.to_string(), "Unsupported element kind: int16");
    }
}
