//! CLI argument definitions.

use super::validators::{parse_non_negative_float, parse_positive_float};
use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Estimate vehicle speeds from the Doppler shift of passing engine noise.
#[derive(Debug, Parser)]
#[command(name = "doppler-speed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Audio files, `.frames.csv` files or directories to analyze.
    pub inputs: Vec<PathBuf>,

    /// Common options for analysis.
    #[command(flatten)]
    pub analyze: AnalyzeArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the analyze command.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalyzeArgs {
    /// Output formats (comma-separated: csv,json).
    #[arg(short, long, value_delimiter = ',', env = "DOPPLER_FORMAT")]
    pub format: Option<Vec<OutputFormat>>,

    /// Output directory (default: same as input).
    #[arg(short, long, env = "DOPPLER_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Speed of sound in m/s.
    #[arg(short = 'c', long, value_parser = parse_positive_float, env = "DOPPLER_SPEED_OF_SOUND")]
    pub speed_of_sound: Option<f64>,

    /// Passage threshold in standard deviations above the mean intensity.
    #[arg(short = 's', long, value_parser = parse_non_negative_float, env = "DOPPLER_THRESHOLD_SIGMA")]
    pub threshold_sigma: Option<f64>,

    /// Sample rate audio is resampled to before frame extraction.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..), env = "DOPPLER_SAMPLE_RATE")]
    pub sample_rate: Option<u32>,

    /// Frames per second (extraction hop, and the rate of frame files).
    #[arg(short = 'r', long, value_parser = clap::value_parser!(u32).range(1..), env = "DOPPLER_FRAME_RATE")]
    pub frame_rate: Option<u32>,

    /// Write CSV rows to stdout instead of result files.
    #[arg(long, conflicts_with_all = ["format", "output_dir"])]
    pub stdout: bool,

    /// Reprocess files even if output exists.
    #[arg(long)]
    pub force: bool,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable progress bars.
    #[arg(long)]
    pub no_progress: bool,

    /// Omit the UTF-8 byte order mark from CSV files.
    #[arg(long)]
    pub no_csv_bom: bool,
}
