//! Parallel processing configuration and batch translation
//!
//! A single GRIB file usually decodes into several datasets (one per level
//! type or step type). Each is translated independently, so a batch is
//! spread over Rayon's global thread pool.

use crate::coords::{ensure_valid_time, translate, CoordModel, RoleRegistry};
use crate::dataset::Dataset;
use crate::errors::{CfCoordsError, Result};
use log::info;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

/// Configuration for parallel processing
#[derive(Debug, Clone, Default)]
pub struct ParallelConfig {
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    /// Create a new parallel configuration
    pub fn new(num_threads: Option<usize>) -> Self {
        Self { num_threads }
    }

    /// Set up the global Rayon thread pool with the specified configuration
    pub fn setup_global_pool(&self) -> Result<()> {
        if let Some(num_threads) = self.num_threads {
            ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()
                .map_err(|e| {
                    CfCoordsError::ThreadPoolError(format!(
                        "Failed to initialize thread pool with {} threads: {}",
                        num_threads, e
                    ))
                })?;

            info!("Configured parallel processing with {} threads", num_threads);
        } else {
            info!("Using default thread pool configuration");
        }

        Ok(())
    }

    /// Get the current number of threads being used
    pub fn current_threads(&self) -> usize {
        rayon::current_num_threads()
    }

    /// Create a configuration that uses all available CPU cores
    pub fn all_cores() -> Self {
        Self {
            num_threads: Some(num_cpus::get()),
        }
    }

    /// Create a configuration that uses a specific number of threads
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }
}

/// Options for [`translate_batch`]
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Derive `valid_time` and make it an index where possible
    pub ensure_valid_time: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            ensure_valid_time: true,
        }
    }
}

/// Translates every dataset on the Rayon pool.
///
/// Results are returned in input order; a failing dataset does not affect
/// the others.
pub fn translate_batch(
    datasets: Vec<Dataset>,
    coord_model: &CoordModel,
    registry: &RoleRegistry,
    options: &BatchOptions,
) -> Vec<Result<Dataset>> {
    info!(
        "Translating {} datasets across {} threads",
        datasets.len(),
        rayon::current_num_threads()
    );
    datasets
        .into_par_iter()
        .map(|dataset| {
            let dataset = translate(dataset, coord_model, registry)?;
            if options.ensure_valid_time {
                ensure_valid_time(dataset)
            } else {
                Ok(dataset)
            }
        })
        .collect()
}
