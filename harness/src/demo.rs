use crate::encode::encode_into_dir;
use crate::formats::*;
use crate::generate::generate_pair;
use anyhow::Result;
use skew_engine::wire::write_elements_le;
use skew_engine::{
    decode_wire_frame, reference_product, verify, CompareMode, Element, EngineConfig, Matrix,
    MatrixPair,
};
use tempfile::TempDir;

/// Encode a random pair into a temp directory, then read the files back and
/// check that the frame decodes to the operands and the reference to A·B.
pub fn run_demo(seed: u64, n: usize) -> Result<()> {
    println!("🚀 Running encoder self-check with seed={}, n={}", seed, n);

    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path();
    let config = EngineConfig {
        n,
        mode: CompareMode::Element,
        seed,
        ..EngineConfig::default()
    };

    println!("📊 Step 1: Generating and encoding operands...");
    let pair = generate_pair(n, config.kind, seed)?;
    let manifest = encode_into_dir(&pair, &config, dir, "input.bin", "output.bin")?;

    println!("🔍 Step 2: Decoding the wire frame...");
    let wire = read_stream(dir.join(&manifest.wire_path))?;
    let reference = read_stream(dir.join(&manifest.reference_path))?;
    let recomputed = match &pair {
        MatrixPair::Int32(a, b) => check_operands(&wire, a, b)?,
        MatrixPair::Float32(a, b) => check_operands(&wire, a, b)?,
    };
    println!("   ✓ Frame decodes to the original operands");

    println!("🔍 Step 3: Checking the reference stream...");
    let result = verify(&reference, &recomputed, n, config.kind, config.mode)?;
    if !result.passed() {
        anyhow::bail!(
            "reference stream differs from recomputed product at {} elements",
            result.mismatches.len()
        );
    }
    println!("   ✓ Reference matches A·B");

    println!("🎉 Self-check passed ({} + {} bytes)", wire.len(), reference.len());
    Ok(())
}

/// Returns A·B recomputed from the decoded operands, little-endian
fn check_operands<T: Element>(wire: &[u8], a: &Matrix<T>, b: &Matrix<T>) -> Result<Vec<u8>> {
    let (a_skew, b_skew) = decode_wire_frame::<T>(wire, a.n())?;
    let decoded_a = a_skew.unskew_rows()?;
    let decoded_b = b_skew.unskew_columns()?;
    if &decoded_a != a || &decoded_b != b {
        anyhow::bail!("wire frame does not decode to the encoded operands");
    }

    let product = reference_product(&decoded_a, &decoded_b)?;
    let mut out: Vec<u8> = Vec::new();
    write_elements_le(&mut out, product.as_row_major())?;
    Ok(out)
}
