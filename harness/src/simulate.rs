use crate::cli::RunArgs;
use crate::encode::encode_into_dir;
use crate::formats::*;
use crate::generate::generate_pair;
use crate::verify::{judge, print_result};
use anyhow::{Context, Result};
use skew_engine::{verify, EngineConfig};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Run the simulator command through the shell inside `work_dir`, blocking until it exits
pub fn run_simulator(sim_cmd: &str, work_dir: &Path) -> Result<()> {
    info!(command = sim_cmd, dir = %work_dir.display(), "starting simulator");
    let output = shell(sim_cmd)
        .current_dir(work_dir)
        .output()
        .with_context(|| format!("spawning simulator command '{}'", sim_cmd))?;

    debug!(stdout = %String::from_utf8_lossy(&output.stdout), "simulator stdout");
    if !output.status.success() {
        anyhow::bail!(
            "simulator command '{}' exited with {}: {}",
            sim_cmd,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}

#[cfg(unix)]
fn shell(cmd: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(cmd);
    command
}

#[cfg(windows)]
fn shell(cmd: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(cmd);
    command
}

pub fn run_pipeline(args: RunArgs) -> Result<()> {
    println!("🚀 Systolic array check: {}x{} {}, seed={}", args.n, args.n, args.kind, args.seed);
    let start_time = std::time::Instant::now();

    let config = EngineConfig {
        n: args.n,
        kind: args.kind,
        mode: args.mode,
        seed: args.seed,
    };

    // Step 1: Operands
    println!("🎲 Step 1: Generating operands...");
    let pair = generate_pair(config.n, config.kind, config.seed)?;

    // Step 2: Streams
    println!("📦 Step 2: Encoding wire frame and reference...");
    std::fs::create_dir_all(&args.work_dir)?;
    let manifest = encode_into_dir(&pair, &config, &args.work_dir, "input.bin", "output.bin")?;

    // Step 3: Simulator
    println!("🔧 Step 3: Running `{}`...", args.sim_cmd);
    let actual_path = args.work_dir.join(&args.actual_name);
    if actual_path.exists() {
        // A stale result from an earlier run must not be mistaken for this one
        std::fs::remove_file(&actual_path)?;
    }
    run_simulator(&args.sim_cmd, &args.work_dir)?;

    // Step 4: Verdict
    println!("🔍 Step 4: Verifying simulator output...");
    let expected = read_stream(args.work_dir.join(&manifest.reference_path))?;
    let actual = read_stream(&actual_path)?;
    let result = verify(&expected, &actual, config.n, config.kind, config.mode)?;
    print_result(&result, config.n);

    println!("⏱️  Completed in {:.3}s", start_time.elapsed().as_secs_f64());
    if judge(&result, args.tolerance) {
        println!("Success!");
        Ok(())
    } else {
        println!("Failure!");
        anyhow::bail!("Simulator output does not match the reference");
    }
}
