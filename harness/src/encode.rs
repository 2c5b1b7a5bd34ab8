use crate::cli::EncodeArgs;
use crate::formats::*;
use crate::generate::generate_pair;
use anyhow::Result;
use skew_engine::{encode, EngineConfig, MatrixPair};
use std::path::Path;
use tracing::info;

pub fn run_encode(args: EncodeArgs) -> Result<RunManifest> {
    let pair = match (&args.a_path, &args.b_path) {
        (Some(a_path), Some(b_path)) => {
            println!("📂 Loading operands from {} and {}...", a_path.display(), b_path.display());
            load_pair(a_path, b_path, args.kind)?
        }
        _ => {
            println!(
                "🎲 Generating {}x{} {} operands (seed={})",
                args.n, args.n, args.kind, args.seed
            );
            generate_pair(args.n, args.kind, args.seed)?
        }
    };

    let config = EngineConfig {
        n: pair.n(),
        kind: pair.kind(),
        seed: args.seed,
        ..EngineConfig::default()
    };

    std::fs::create_dir_all(&args.out_dir)?;
    encode_into_dir(&pair, &config, &args.out_dir, &args.wire_name, &args.reference_name)
}

/// Encode `pair` and write the wire frame, reference stream and manifest into `dir`.
pub fn encode_into_dir(
    pair: &MatrixPair,
    config: &EngineConfig,
    dir: &Path,
    wire_name: &str,
    reference_name: &str,
) -> Result<RunManifest> {
    println!("⚡ Skewing operands and computing reference product...");
    let streams = encode(pair)?;

    let wire_path = dir.join(wire_name);
    let reference_path = dir.join(reference_name);
    write_stream(&wire_path, &streams.wire_frame)?;
    write_stream(&reference_path, &streams.reference)?;

    let manifest = RunManifest {
        config: config.clone(),
        wire_path: wire_name.to_string(),
        reference_path: reference_name.to_string(),
        wire_sha256: sha256_hex(&streams.wire_frame),
        reference_sha256: sha256_hex(&streams.reference),
    };
    let manifest_path = dir.join(MANIFEST_NAME);
    save_manifest(&manifest_path, &manifest)?;

    info!(
        wire = %wire_path.display(),
        reference = %reference_path.display(),
        "streams written"
    );
    println!("💾 Wire frame:  {} ({} bytes)", wire_path.display(), streams.wire_frame.len());
    println!("💾 Reference:   {} ({} bytes)", reference_path.display(), streams.reference.len());
    println!("📋 Manifest:    {}", manifest_path.display());

    Ok(manifest)
}
