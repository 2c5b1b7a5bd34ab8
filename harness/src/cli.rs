use clap::Args;
use skew_engine::{CompareMode, ElementKind};
use std::path::PathBuf;

#[derive(Args, Clone)]
pub struct GenerateArgs {
    /// Array size (operands are n×n)
    #[arg(long, default_value = "4")]
    pub n: usize,

    /// Element type: int32 or float32
    #[arg(long, default_value = "int32")]
    pub kind: ElementKind,

    /// Random seed for deterministic generation
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Output path for matrix A
    #[arg(long, default_value = "a.json")]
    pub a_path: PathBuf,

    /// Output path for matrix B
    #[arg(long, default_value = "b.json")]
    pub b_path: PathBuf,
}

#[derive(Args, Clone)]
pub struct EncodeArgs {
    /// Matrix A as a JSON array of rows (generated from --seed if omitted)
    #[arg(long, requires = "b_path")]
    pub a_path: Option<PathBuf>,

    /// Matrix B as a JSON array of rows
    #[arg(long, requires = "a_path")]
    pub b_path: Option<PathBuf>,

    /// Array size used when generating operands
    #[arg(long, default_value = "4")]
    pub n: usize,

    /// Element type: int32 or float32
    #[arg(long, default_value = "int32")]
    pub kind: ElementKind,

    /// Random seed used when generating operands
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Directory receiving the streams and run manifest
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// File name of the wire frame fed to the simulator
    #[arg(long, default_value = "input.bin")]
    pub wire_name: String,

    /// File name of the golden reference stream
    #[arg(long, default_value = "output.bin")]
    pub reference_name: String,
}

#[derive(Args, Clone)]
pub struct VerifyArgs {
    /// Golden reference stream (defaults to the manifest's reference, else output.bin)
    #[arg(long)]
    pub expected: Option<PathBuf>,

    /// Simulator output stream
    #[arg(long, default_value = "output_actual.bin")]
    pub actual: PathBuf,

    /// Run manifest supplying n and element type when not given explicitly
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Array size (overrides the manifest)
    #[arg(long)]
    pub n: Option<usize>,

    /// Element type (overrides the manifest)
    #[arg(long)]
    pub kind: Option<ElementKind>,

    /// Comparison mode: strict (byte-exact) or element (per-element diagnostics)
    #[arg(long, default_value = "strict")]
    pub mode: CompareMode,

    /// Accept element-mode mismatches whose absolute difference is within this bound
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Write the structured verification result as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Args, Clone)]
pub struct RunArgs {
    /// Array size
    #[arg(long, default_value = "4")]
    pub n: usize,

    /// Element type: int32 or float32
    #[arg(long, default_value = "int32")]
    pub kind: ElementKind,

    /// Random seed for operand generation
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Working directory of the simulator (streams are written here)
    #[arg(long, default_value = ".")]
    pub work_dir: PathBuf,

    /// Shell command that runs the simulator
    #[arg(long, env = "SYSTOLIC_SIM_CMD", default_value = "make systolic_array.sim")]
    pub sim_cmd: String,

    /// File the simulator writes its result to, relative to the working directory
    #[arg(long, default_value = "output_actual.bin")]
    pub actual_name: String,

    /// Comparison mode: strict or element
    #[arg(long, default_value = "strict")]
    pub mode: CompareMode,

    /// Absolute tolerance applied to element-mode mismatches
    #[arg(long)]
    pub tolerance: Option<f64>,
}
