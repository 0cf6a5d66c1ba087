//! Defines command-line interface options using `clap` for the cfcoords application.

use clap::Parser;
use std::path::PathBuf;

/// A CLI tool for normalizing coordinates of decoded GRIB datasets
#[derive(Parser, Debug)]
#[command(
    version,
    name = "cfcoords",
    about = "Rename and convert dataset coordinates to CF conventions"
)]
pub struct Args {
    /// Path to a JSON dataset description; repeat for several datasets
    #[arg(short, long = "file", required = true)]
    pub files: Vec<PathBuf>,

    /// JSON file overriding canonical names and units per role
    #[arg(long)]
    pub coord_model: Option<PathBuf>,

    /// Do not derive valid_time or promote it to a dimension
    #[arg(long, default_value_t = false)]
    pub no_valid_time: bool,

    /// Print global attributes and all variables after translation
    #[arg(long, default_value_t = false)]
    pub metadata: bool,

    /// Describe a specific coordinate (dtype, shape, attributes and values) after translation
    #[arg(long)]
    pub describe: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Number of threads to use for parallel processing. Defaults to number of CPU cores.
    #[arg(short = 't', long)]
    pub threads: Option<usize>,
}
