use crate::cli::GenerateArgs;
use crate::formats::save_pair;
use anyhow::Result;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use skew_engine::{ElementKind, Matrix, MatrixPair};

/// Upper bound (exclusive) for generated integer operands
pub const INT_RANGE_END: i32 = 1 << 30;

/// Generate a random operand pair: integers in [0, 2^30), floats in [-1, 1)
pub fn generate_pair(n: usize, kind: ElementKind, seed: u64) -> Result<MatrixPair> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let pair = match kind {
        ElementKind::Int32 => {
            let mut random = || -> Result<Matrix<i32>> {
                let data = (0..n * n).map(|_| rng.gen_range(0..INT_RANGE_END)).collect();
                Ok(Matrix::from_row_major(n, data)?)
            };
            let a = random()?;
            let b = random()?;
            MatrixPair::int32(a, b)?
        }
        ElementKind::Float32 => {
            let mut random = || -> Result<Matrix<f32>> {
                let data = (0..n * n).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
                Ok(Matrix::from_row_major(n, data)?)
            };
            let a = random()?;
            let b = random()?;
            MatrixPair::float32(a, b)?
        }
    };

    Ok(pair)
}

pub fn run_generate(args: GenerateArgs) -> Result<()> {
    println!("🎲 Generating {}x{} {} operands (seed={})", args.n, args.n, args.kind, args.seed);
    let pair = generate_pair(args.n, args.kind, args.seed)?;
    save_pair(&args.a_path, &args.b_path, &pair)?;
    println!("✅ Wrote A to {} and B to {}", args.a_path.display(), args.b_path.display());
    Ok(())
}
