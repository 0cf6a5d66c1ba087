//! Deriving the `valid_time` coordinate and promoting it to a dimension

use super::roles::RolePredicate;
use crate::dataset::Dataset;
use crate::errors::{CfCoordsError, Result};
use log::info;

pub const DEFAULT_VALID_TIME_NAME: &str = "valid_time";

/// Coordinates involved in [`ensure_valid_time_present`]
///
/// `reference_time` and `period` are empty when they were not used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidTimeNames {
    pub valid_time: String,
    pub reference_time: String,
    pub period: String,
}

/// Makes sure the dataset has a valid time coordinate.
///
/// An existing valid time coordinate is used as is. Otherwise one named
/// `derived_name` is computed as forecast reference time plus forecast
/// period, or as a copy of the reference time when there is no period.
/// When several coordinates match a role the first one wins.
///
/// # Errors
///
/// Returns [`CfCoordsError::Derivation`] when neither a valid time nor a
/// forecast reference time coordinate exists.
pub fn ensure_valid_time_present(
    mut dataset: Dataset,
    derived_name: &str,
) -> Result<(Dataset, ValidTimeNames)> {
    let valid_times = RolePredicate::ValidTime.matching_coords(&dataset);
    let times = RolePredicate::ForecastReferenceTime.matching_coords(&dataset);
    let steps = RolePredicate::ForecastPeriod.matching_coords(&dataset);

    if let Some(valid_time) = valid_times.into_iter().next() {
        let names = ValidTimeNames {
            valid_time,
            ..ValidTimeNames::default()
        };
        return Ok((dataset, names));
    }

    let time = times.into_iter().next().ok_or_else(|| {
        CfCoordsError::Derivation(
            "no valid time or forecast reference time coordinate found".to_string(),
        )
    })?;
    let reference = dataset
        .coord(&time)
        .ok_or_else(|| CfCoordsError::CoordinateNotFound { name: time.clone() })?;

    let (mut derived, step) = match steps.into_iter().next() {
        Some(step) => {
            let period = dataset
                .coord(&step)
                .ok_or_else(|| CfCoordsError::CoordinateNotFound { name: step.clone() })?;
            (reference.add(period, derived_name)?, step)
        }
        None => {
            let mut copy = reference.clone();
            copy.name = derived_name.to_string();
            (copy, String::new())
        }
    };
    derived.set_attr("standard_name", "time");

    if step.is_empty() {
        info!("derived '{derived_name}' from '{time}'");
    } else {
        info!("derived '{derived_name}' from '{time}' + '{step}'");
    }
    dataset.set_coord(derived)?;

    let names = ValidTimeNames {
        valid_time: derived_name.to_string(),
        reference_time: time,
        period: step,
    };
    Ok((dataset, names))
}

/// Ensures a valid time coordinate exists and, when possible, makes it the
/// index of the reference time or forecast period dimension it lies along.
pub fn ensure_valid_time(dataset: Dataset) -> Result<Dataset> {
    let (dataset, names) = ensure_valid_time_present(dataset, DEFAULT_VALID_TIME_NAME)?;
    if dataset.is_dim(&names.valid_time) {
        return Ok(dataset);
    }
    let Some(valid_time) = dataset.coord(&names.valid_time) else {
        return Ok(dataset);
    };
    let size = valid_time.len();

    let swap_for = [&names.reference_time, &names.period]
        .into_iter()
        .find(|dim| {
            !dim.is_empty()
                && dataset.is_dim(dim)
                && dataset.coord(dim).is_some_and(|coord| coord.len() == size)
                && valid_time.dims == [dim.as_str()]
        })
        .cloned();

    match swap_for {
        Some(dim) => {
            info!("swapping dimension '{dim}' for '{}'", names.valid_time);
            dataset.swap_dims(&dim, &names.valid_time)
        }
        None => Ok(dataset),
    }
}
