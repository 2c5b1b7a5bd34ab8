use crate::cli::VerifyArgs;
use crate::formats::*;
use anyhow::{Context, Result};
use skew_engine::{verify, CompareMode, ElementKind, VerificationResult, Verdict};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::warn;

pub fn run_verify(args: VerifyArgs) -> Result<()> {
    let manifest = match &args.manifest {
        Some(path) => Some((path.as_path(), load_manifest(path)?)),
        None => None,
    };
    let manifest = manifest.as_ref().map(|(path, m)| (*path, m));

    let (n, kind) = resolve_shape(&args, manifest.map(|(_, m)| m))?;
    let expected_path = resolve_expected(&args, manifest);

    println!(
        "🔍 Comparing {} against {} ({}x{} {}, {} mode)...",
        args.actual.display(),
        expected_path.display(),
        n,
        n,
        kind,
        args.mode
    );
    let expected = read_stream(&expected_path)?;
    let actual = read_stream(&args.actual)?;

    if let Some((_, manifest)) = manifest {
        if sha256_hex(&expected) != manifest.reference_sha256 {
            warn!(
                reference = %expected_path.display(),
                "reference stream does not match the digest recorded in the manifest"
            );
        }
    }

    let result = verify(&expected, &actual, n, kind, args.mode)?;
    print_result(&result, n);

    if let Some(ref report) = args.report {
        let file =
            File::create(report).with_context(|| format!("creating {}", report.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &result)?;
        println!("📝 Report written to {}", report.display());
    }

    if judge(&result, args.tolerance) {
        println!("Success!");
        Ok(())
    } else {
        println!("Failure!");
        anyhow::bail!("Simulator output does not match the reference");
    }
}

/// n and element type come from the flags, falling back to the run manifest
fn resolve_shape(
    args: &VerifyArgs,
    manifest: Option<&RunManifest>,
) -> Result<(usize, ElementKind)> {
    let n = args
        .n
        .or_else(|| manifest.map(|m| m.config.n))
        .ok_or_else(|| anyhow::anyhow!("--n or --manifest required"))?;
    let kind = args
        .kind
        .or_else(|| manifest.map(|m| m.config.kind))
        .unwrap_or(ElementKind::Int32);

    if n == 0 {
        anyhow::bail!("array size must be at least 1");
    }
    Ok((n, kind))
}

/// `--expected` wins; otherwise the manifest's reference, relative to the manifest
fn resolve_expected(args: &VerifyArgs, manifest: Option<(&Path, &RunManifest)>) -> PathBuf {
    match (&args.expected, manifest) {
        (Some(path), _) => path.clone(),
        (None, Some((manifest_path, manifest))) => manifest_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&manifest.reference_path),
        (None, None) => PathBuf::from(DEFAULT_REFERENCE_NAME),
    }
}

/// Final pass/fail, applying the caller's tolerance to element-mode mismatches
pub fn judge(result: &VerificationResult, tolerance: Option<f64>) -> bool {
    match tolerance {
        Some(tolerance) => result.within_tolerance(tolerance),
        None => result.passed(),
    }
}

pub fn print_result(result: &VerificationResult, n: usize) {
    match (result.verdict, result.mode) {
        (Verdict::Pass, _) => println!("✅ Streams match"),
        (Verdict::Fail, CompareMode::Strict) => println!("❌ Streams differ"),
        (Verdict::Fail, CompareMode::Element) => {
            println!("❌ {} of {} elements differ:", result.mismatches.len(), n * n);
            for m in &result.mismatches {
                println!(
                    "   [{}][{}] expected={} actual={} (|Δ|={})",
                    m.row(n),
                    m.col(n),
                    m.expected,
                    m.actual,
                    m.abs_diff()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skew_engine::wire::write_elements_le;
    use skew_engine::{EngineConfig, Mismatch, Value};
    use tempfile::TempDir;

    fn write_i32(path: &Path, values: &[i32]) {
        let mut out: Vec<u8> = Vec::new();
        write_elements_le(&mut out, values).unwrap();
        write_stream(path, &out).unwrap();
    }

    fn args(dir: &Path, mode: CompareMode) -> VerifyArgs {
        VerifyArgs {
            expected: Some(dir.join("output.bin")),
            actual: dir.join("output_actual.bin"),
            manifest: None,
            n: Some(2),
            kind: Some(ElementKind::Int32),
            mode,
            tolerance: None,
            report: None,
        }
    }

    #[test]
    fn test_matching_streams_pass() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        write_i32(&dir.join("output.bin"), &[19, 22, 43, 50]);
        write_i32(&dir.join("output_actual.bin"), &[19, 22, 43, 50]);

        run_verify(args(dir, CompareMode::Strict)).unwrap();
        run_verify(args(dir, CompareMode::Element)).unwrap();
    }

    #[test]
    fn test_mismatch_fails_and_reports() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        write_i32(&dir.join("output.bin"), &[19, 22, 43, 50]);
        write_i32(&dir.join("output_actual.bin"), &[19, 22, 43, 51]);

        let mut verify_args = args(dir, CompareMode::Element);
        verify_args.report = Some(dir.join("report.json"));
        assert!(run_verify(verify_args).is_err());

        let report: VerificationResult =
            serde_json::from_reader(File::open(dir.join("report.json")).unwrap()).unwrap();
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.mismatches[0].index, 3);
        assert_eq!(report.mismatches[0].actual, Value::Int32(51));
    }

    fn manifest_for(n: usize, reference_path: &str, reference: &[u8]) -> RunManifest {
        RunManifest {
            config: EngineConfig { n, ..EngineConfig::default() },
            wire_path: "input.bin".to_string(),
            reference_path: reference_path.to_string(),
            wire_sha256: String::new(),
            reference_sha256: sha256_hex(reference),
        }
    }

    #[test]
    fn test_shape_from_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        write_i32(&dir.join("output.bin"), &[0; 9]);
        write_i32(&dir.join("output_actual.bin"), &[0; 9]);

        let manifest = manifest_for(3, "output.bin", &[]);
        save_manifest(dir.join(MANIFEST_NAME), &manifest).unwrap();

        let mut verify_args = args(dir, CompareMode::Element);
        verify_args.n = None;
        verify_args.kind = None;
        verify_args.manifest = Some(dir.join(MANIFEST_NAME));
        assert_eq!(
            resolve_shape(&verify_args, Some(&manifest)).unwrap(),
            (3, ElementKind::Int32)
        );
        run_verify(verify_args).unwrap();
    }

    #[test]
    fn test_reference_resolved_next_to_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let out_dir = dir.join("out");
        std::fs::create_dir_all(&out_dir).unwrap();

        write_i32(&out_dir.join("golden.bin"), &[19, 22, 43, 50]);
        write_i32(&dir.join("output_actual.bin"), &[19, 22, 43, 50]);
        let reference = read_stream(out_dir.join("golden.bin")).unwrap();
        let manifest = manifest_for(2, "golden.bin", &reference);
        let manifest_path = out_dir.join(MANIFEST_NAME);
        save_manifest(&manifest_path, &manifest).unwrap();

        let mut verify_args = args(dir, CompareMode::Strict);
        verify_args.expected = None;
        verify_args.n = None;
        verify_args.manifest = Some(manifest_path.clone());
        assert_eq!(
            resolve_expected(&verify_args, Some((manifest_path.as_path(), &manifest))),
            out_dir.join("golden.bin")
        );
        run_verify(verify_args.clone()).unwrap();

        // An explicit --expected still takes precedence over the manifest
        write_i32(&dir.join("other.bin"), &[0, 0, 0, 0]);
        verify_args.expected = Some(dir.join("other.bin"));
        assert!(run_verify(verify_args).is_err());
    }

    #[test]
    fn test_default_reference_without_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let mut verify_args = args(temp_dir.path(), CompareMode::Strict);
        verify_args.expected = None;
        assert_eq!(
            resolve_expected(&verify_args, None),
            PathBuf::from(DEFAULT_REFERENCE_NAME)
        );
    }

    #[test]
    fn test_missing_size_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut verify_args = args(temp_dir.path(), CompareMode::Strict);
        verify_args.n = None;
        assert!(resolve_shape(&verify_args, None).is_err());
    }

    #[test]
    fn test_judge_with_tolerance() {
        let result = VerificationResult {
            mode: CompareMode::Element,
            verdict: Verdict::Fail,
            mismatches: vec![Mismatch {
                index: 0,
                expected: Value::Float32(1.0),
                actual: Value::Float32(1.0005),
            }],
        };
        assert!(!judge(&result, None));
        assert!(judge(&result, Some(1e-3)));
        assert!(!judge(&result, Some(1e-4)));
    }
}
