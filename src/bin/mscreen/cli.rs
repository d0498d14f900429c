use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use molscreen::{AtomEncoding, DockingMode, SuccessStatsPolicy};

#[derive(Parser)]
#[command(
    name = "mscreen",
    about = "Chemical plausibility screening for generated 3D molecules",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate a batch of generated samples
    #[command(visible_alias = "e")]
    Eval(EvalArgs),
}

#[derive(Args)]
pub struct EvalArgs {
    #[command(flatten)]
    pub io: IoOptions,

    #[command(flatten)]
    pub pipeline: PipelineOptions,

    #[command(flatten)]
    pub docking: DockingOptions,
}

/// I/O options.
#[derive(Args)]
pub struct IoOptions {
    /// Sample set JSON produced by the generator
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Reference bond-length profile (embedded default if omitted)
    #[arg(long, value_name = "FILE")]
    pub reference: Option<PathBuf>,

    /// Directory for the report and histogram artifacts
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Also write per-key histogram JSON files into the output directory
    #[arg(long)]
    pub save_histograms: bool,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    /// Log per-sample failures and stage details
    #[arg(short, long)]
    pub verbose: bool,
}

/// Pipeline options.
#[derive(Args)]
#[command(next_help_heading = "Pipeline")]
pub struct PipelineOptions {
    /// Atom-type encoding used by the generator
    #[arg(long = "atom-encoding", value_name = "MODE", default_value = "add-aromatic")]
    pub atom_encoding: EncodingArg,

    /// Custom bonding rules (TOML file)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Which samples feed the success statistics
    #[arg(long = "success-stats", value_name = "POLICY", default_value = "docked")]
    pub success_stats: SuccessStatsArg,
}

/// Docking options.
#[derive(Args)]
#[command(next_help_heading = "Docking")]
pub struct DockingOptions {
    /// Docking mode
    #[arg(long = "docking", value_name = "MODE", default_value = "none")]
    pub mode: DockingModeArg,

    /// Docking backend executable
    #[arg(long = "docking-exe", value_name = "PATH", default_value = "vina")]
    pub program: PathBuf,

    /// Root directory of receptor structures
    #[arg(long = "receptor-root", value_name = "DIR", default_value = "./data/test_set")]
    pub receptor_root: PathBuf,

    /// Reference ligand id (overrides the sample set's ligand_filename)
    #[arg(long, value_name = "ID")]
    pub ligand: Option<String>,

    /// Search exhaustiveness passed to the backend
    #[arg(long, value_name = "N", default_value = "16")]
    pub exhaustiveness: u32,

    /// Per-invocation timeout in seconds
    #[arg(long = "docking-timeout", value_name = "SECS", default_value = "300")]
    pub timeout: u64,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum EncodingArg {
    /// Indices map to elements only
    Basic,
    /// Indices also carry an aromaticity bit
    #[default]
    #[value(name = "add-aromatic", alias = "add_aromatic")]
    AddAromatic,
}

impl From<EncodingArg> for AtomEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Basic => AtomEncoding::Basic,
            EncodingArg::AddAromatic => AtomEncoding::AddAromatic,
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum DockingModeArg {
    /// Skip docking entirely
    #[default]
    None,
    /// Score the generated pose in place
    #[value(name = "score-only", alias = "score_only")]
    ScoreOnly,
    /// Local minimization before scoring
    Minimize,
    /// Full redocking search
    Dock,
}

impl DockingModeArg {
    pub fn to_mode(self) -> Option<DockingMode> {
        match self {
            DockingModeArg::None => None,
            DockingModeArg::ScoreOnly => Some(DockingMode::ScoreOnly),
            DockingModeArg::Minimize => Some(DockingMode::Minimize),
            DockingModeArg::Dock => Some(DockingMode::Dock),
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum SuccessStatsArg {
    /// Chemical scoring must pass; docking outcome ignored
    Scored,
    /// Docking (when enabled) must also pass
    #[default]
    Docked,
}

impl From<SuccessStatsArg> for SuccessStatsPolicy {
    fn from(arg: SuccessStatsArg) -> Self {
        match arg {
            SuccessStatsArg::Scored => SuccessStatsPolicy::Scored,
            SuccessStatsArg::Docked => SuccessStatsPolicy::Docked,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
