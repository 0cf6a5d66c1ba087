//! Entry point for the cfcoords application.
//! Handles CLI parsing, dataset loading, and prints the translated coordinates of each dataset.

use cfcoords::coords::{CoordModel, RoleRegistry};
use cfcoords::loader::load_dataset_from_path;
use cfcoords::metadata::{describe_coordinate, list_coordinates, print_metadata};
use cfcoords::parallel::{translate_batch, BatchOptions, ParallelConfig};
use clap::Parser;
use env_logger::Env;
use log::error;

mod cli;

use cli::Args;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    ParallelConfig::new(args.threads).setup_global_pool()?;

    let coord_model = match &args.coord_model {
        Some(path) => CoordModel::from_json_file(path)?,
        None => CoordModel::default(),
    };

    let datasets = args
        .files
        .iter()
        .map(|path| load_dataset_from_path(path))
        .collect::<Result<Vec<_>, _>>()?;

    let options = BatchOptions {
        ensure_valid_time: !args.no_valid_time,
    };
    let results = translate_batch(datasets, &coord_model, &RoleRegistry::default(), &options);

    let mut failures = 0;
    for (path, result) in args.files.iter().zip(results) {
        println!("\n### {}", path.display());
        match result {
            Ok(dataset) => {
                if args.metadata {
                    print_metadata(&dataset);
                }
                list_coordinates(&dataset);
                if let Some(name) = &args.describe {
                    describe_coordinate(&dataset, name)?;
                }
            }
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} of {} datasets failed to translate", args.files.len()).into());
    }
    Ok(())
}
