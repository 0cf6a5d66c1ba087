//! Role-by-role renaming and unit conversion of coordinates

use super::model::CoordModel;
use super::roles::{RoleDescriptor, RoleRegistry};
use crate::dataset::{Dataset, Values};
use crate::errors::{CfCoordsError, Result};
use crate::units::{convert_units, is_known_unit};
use log::{debug, warn};

/// Renames the coordinate playing `descriptor`'s role to its canonical name
/// and converts it to the canonical units.
///
/// A dataset without such a coordinate is returned unchanged.
///
/// # Errors
///
/// - [`CfCoordsError::RoleConflict`] if several coordinates match the role
/// - [`CfCoordsError::NamingConflict`] if another coordinate already uses
///   the canonical name
/// - [`CfCoordsError::Conversion`] if the recorded units are pressure units
///   that cannot reach the canonical units
pub fn apply_role(
    descriptor: &RoleDescriptor,
    dataset: Dataset,
    coord_model: &CoordModel,
) -> Result<Dataset> {
    let out_name = coord_model.out_name(descriptor);
    let units = coord_model.units(descriptor);

    let matches = descriptor.predicate.matching_coords(&dataset);
    if matches.len() > 1 {
        return Err(CfCoordsError::RoleConflict {
            role: descriptor.role.clone(),
        });
    }
    let Some(matched) = matches.into_iter().next() else {
        return Ok(dataset);
    };
    if dataset
        .coords()
        .any(|coord| coord.name == out_name && coord.name != matched)
    {
        return Err(CfCoordsError::NamingConflict {
            role: descriptor.role.clone(),
            name: out_name.to_string(),
        });
    }

    debug!("{}: '{}' -> '{}'", descriptor.role, matched, out_name);
    let mut dataset = dataset.rename(&matched, out_name)?;
    let coord = dataset
        .coord_mut(out_name)
        .ok_or_else(|| CfCoordsError::CoordinateNotFound {
            name: out_name.to_string(),
        })?;

    if let Some(recorded) = coord.units().map(str::to_string) {
        if recorded != units {
            if is_known_unit(&recorded) {
                let values = coord.values.clone().into_float()?;
                coord.values = Values::Float(convert_units(values, units, &recorded)?);
                debug!("{}: converted '{}' from {} to {}", descriptor.role, out_name, recorded, units);
            } else {
                warn!(
                    "{}: relabelling '{}' units from {} to {} without conversion",
                    descriptor.role, out_name, recorded, units
                );
            }
        }
        coord.set_attr("units", units);
    }
    Ok(dataset)
}

/// Applies every role of `registry`, in registration order.
///
/// Roles are applied one after the other; when one fails the whole call
/// fails and the partially translated dataset is dropped.
pub fn translate(dataset: Dataset, coord_model: &CoordModel, registry: &RoleRegistry) -> Result<Dataset> {
    registry
        .iter()
        .try_fold(dataset, |dataset, descriptor| apply_role(descriptor, dataset, coord_model))
}

/// [`translate`] with the default roles and no overrides
pub fn translate_default(dataset: Dataset) -> Result<Dataset> {
    translate(dataset, &CoordModel::default(), &RoleRegistry::default())
}
