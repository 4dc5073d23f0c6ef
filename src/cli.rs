use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::DENSITY_RADIUS;

/// Fusion engine CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "mapfuse", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// JSON config overriding the built-in scene defaults
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Join survey records onto polygon features and project them
    Fuse(FuseArgs),

    /// Segment the fused dataset by a categorical attribute
    Classify(ClassifyArgs),

    /// Circle-overlap density counts for the projected centers
    Density(DensityArgs),
}

#[derive(Args, Debug)]
pub struct DataArgs {
    /// Survey CSV (URL or file path); overrides the configured location
    #[arg(long)]
    pub csv: Option<String>,

    /// Polygon GeoJSON (URL or file path); overrides the configured location
    #[arg(long)]
    pub geojson: Option<String>,
}

#[derive(Args, Debug)]
pub struct ExtentArgs {
    /// Target-space bounds as reported by the point-cloud scene
    #[arg(
        long,
        num_args = 4,
        value_names = ["X_MIN", "X_MAX", "Y_MIN", "Y_MAX"],
        allow_negative_numbers = true,
        default_values_t = [0.0, 1000.0, 0.0, 1000.0]
    )]
    pub target: Vec<f64>,
}

#[derive(Args, Debug)]
pub struct FuseArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub extent: ExtentArgs,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Attribute name from the attribute table, e.g. GENDER
    pub attribute: String,

    /// Number of top classes to select for display
    #[arg(long, default_value_t = 2)]
    pub top: usize,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DensityArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub extent: ExtentArgs,

    /// Circle radius in target units
    #[arg(long, default_value_t = DENSITY_RADIUS)]
    pub radius: f64,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
