use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;
mod demo;
mod encode;
mod formats;
mod generate;
mod simulate;
mod verify;

use cli::*;

#[derive(Parser)]
#[command(name = "systolic_harness")]
#[command(about = "Systolic-array matmul testbench: skewed stimulus, golden reference, result check")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random pair of n×n operand matrices as JSON
    Generate(GenerateArgs),
    /// Encode operands into the simulator wire frame and the golden reference
    Encode(EncodeArgs),
    /// Compare the simulator's output against the golden reference
    Verify(VerifyArgs),
    /// Full cycle: generate → encode → run simulator → verify
    Run(RunArgs),
    /// Self-check of the encoder without a simulator (temp directory)
    Demo {
        /// Random seed for demo
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Array size
        #[arg(long, default_value = "4")]
        n: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate::run_generate(args),
        Commands::Encode(args) => encode::run_encode(args).map(|_| ()),
        Commands::Verify(args) => verify::run_verify(args),
        Commands::Run(args) => simulate::run_pipeline(args),
        Commands::Demo { seed, n } => demo::run_demo(seed, n),
    }
}
