//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use tomosim_shapes::ProbeModel;

/// Log levels selectable on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Probe interpretation flag.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProbeArg {
    /// Infinite parallel-beam line through the two sample points
    Line,
    /// Bounded segment between the two sample points
    Segment,
}

impl From<ProbeArg> for ProbeModel {
    fn from(arg: ProbeArg) -> Self {
        match arg {
            ProbeArg::Line => ProbeModel::Line,
            ProbeArg::Segment => ProbeModel::Segment,
        }
    }
}

/// Output encoding for the loss tensor.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Tensor length, then one loss per line
    #[default]
    Text,
    /// `{"resolution": N, "values": [...]}`
    Json,
}

#[derive(Parser)]
#[command(name = "tomosim")]
#[command(about = "Parallel-beam tomography data acquisition emulator", long_about = None)]
pub struct Cli {
    /// Logging level
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the loss tensor for a scene
    Run {
        #[command(flatten)]
        scene: SceneArgs,

        /// Probe interpretation (overrides the scene file)
        #[arg(long, value_enum)]
        probe_model: Option<ProbeArg>,

        /// Evaluate on a single thread
        #[arg(long)]
        serial: bool,

        /// Output encoding
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the tensor to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show grid size and memory estimate without running
    Info {
        #[command(flatten)]
        scene: SceneArgs,
    },
}

/// Scene selection shared by all subcommands.
#[derive(Args, Debug, Clone)]
pub struct SceneArgs {
    /// TOML scene file (default: built-in two-point box scene)
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Detector points per axis (overrides the scene file)
    #[arg(short = 'n', long)]
    pub resolution: Option<usize>,
}
