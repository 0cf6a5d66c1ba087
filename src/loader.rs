//! Building datasets from JSON descriptions
//!
//! The description mirrors what a GRIB decoder hands over:
//!
//! ```json
//! {
//!   "dims": { "isobaricInhPa": 2 },
//!   "coords": [
//!     { "name": "time", "dtype": "datetime64[ns]", "values": "2017-01-01T00:00:00Z",
//!       "attrs": { "standard_name": "forecast_reference_time" } },
//!     { "name": "isobaricInhPa", "dims": ["isobaricInhPa"], "values": [500, 850],
//!       "attrs": { "units": "hPa" } }
//!   ],
//!   "data_vars": [],
//!   "attrs": { "GRIB_edition": 1 }
//! }
//! ```
//!
//! Coordinates are an array so their order is explicit.

use crate::dataset::{Attributes, DType, Dataset, Values, Variable};
use crate::errors::{CfCoordsError, Result};
use chrono::{DateTime, NaiveDateTime};
use ndarray::{ArrayD, IxDyn};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct DatasetSpec {
    #[serde(default)]
    dims: BTreeMap<String, usize>,
    #[serde(default)]
    coords: Vec<VariableSpec>,
    #[serde(default)]
    data_vars: Vec<VariableSpec>,
    #[serde(default)]
    attrs: Attributes,
}

#[derive(Debug, Deserialize)]
struct VariableSpec {
    name: String,
    #[serde(default)]
    dims: Vec<String>,
    #[serde(default)]
    dtype: Option<String>,
    values: JsonValue,
    #[serde(default)]
    attrs: Attributes,
}

/// Parse a dataset description
pub fn load_dataset_from_str(json: &str) -> Result<Dataset> {
    let spec: DatasetSpec = serde_json::from_str(json)?;
    let mut dataset = Dataset::new();
    for (name, &length) in &spec.dims {
        dataset = dataset.with_dim(name, length)?;
    }
    for coord in spec.coords {
        dataset.set_coord(build_variable(coord)?)?;
    }
    for var in spec.data_vars {
        dataset.set_data_var(build_variable(var)?)?;
    }
    dataset.attrs = spec.attrs;
    Ok(dataset)
}

/// Read and parse a dataset description file
pub fn load_dataset_from_path(path: &Path) -> Result<Dataset> {
    let content = fs::read_to_string(path)?;
    load_dataset_from_str(&content)
}

fn build_variable(spec: VariableSpec) -> Result<Variable> {
    let dtype = match spec.dtype.as_deref() {
        None => DType::Float64,
        Some(name) => DType::parse(name).ok_or_else(|| {
            CfCoordsError::InvalidFixture(format!("unknown dtype '{name}' for '{}'", spec.name))
        })?,
    };
    let shape = infer_shape(&spec.values, spec.dims.len(), &spec.name)?;
    let mut leaves = Vec::new();
    flatten(&spec.values, &shape, &mut leaves, &spec.name)?;

    let values = match dtype {
        DType::Float64 => Values::Float(to_array(&shape, &leaves, &spec.name, parse_float)?),
        DType::Int64 => Values::Int(to_array(&shape, &leaves, &spec.name, parse_int)?),
        DType::DateTime64 => Values::DateTime(to_array(&shape, &leaves, &spec.name, parse_datetime)?),
        DType::TimeDelta64 => Values::TimeDelta(to_array(&shape, &leaves, &spec.name, parse_int)?),
    };

    let mut variable = Variable::new(&spec.name, spec.dims.as_slice(), values)?;
    variable.attrs = spec.attrs;
    Ok(variable)
}

/// Walk the first element of each nesting level to find the array shape
fn infer_shape(values: &JsonValue, ndim: usize, name: &str) -> Result<Vec<usize>> {
    let mut shape = Vec::with_capacity(ndim);
    let mut current = values;
    for _ in 0..ndim {
        let items = current.as_array().ok_or_else(|| {
            CfCoordsError::InvalidFixture(format!(
                "values of '{name}' are nested less than its {ndim} dimensions"
            ))
        })?;
        shape.push(items.len());
        match items.first() {
            Some(first) => current = first,
            None => {
                shape.resize(ndim, 0);
                break;
            }
        }
    }
    Ok(shape)
}

fn flatten<'a>(
    value: &'a JsonValue,
    shape: &[usize],
    leaves: &mut Vec<&'a JsonValue>,
    name: &str,
) -> Result<()> {
    match shape.split_first() {
        None => {
            leaves.push(value);
            Ok(())
        }
        Some((&len, rest)) => {
            let items = value
                .as_array()
                .filter(|items| items.len() == len)
                .ok_or_else(|| CfCoordsError::InvalidFixture(format!("values of '{name}' are ragged")))?;
            for item in items {
                flatten(item, rest, leaves, name)?;
            }
            Ok(())
        }
    }
}

fn to_array<T>(
    shape: &[usize],
    leaves: &[&JsonValue],
    name: &str,
    parse: fn(&JsonValue) -> Option<T>,
) -> Result<ArrayD<T>> {
    let parsed = leaves
        .iter()
        .map(|leaf| {
            parse(leaf).ok_or_else(|| {
                CfCoordsError::InvalidFixture(format!("unexpected value {leaf} in '{name}'"))
            })
        })
        .collect::<Result<Vec<T>>>()?;
    Ok(ArrayD::from_shape_vec(IxDyn(shape), parsed)?)
}

fn parse_float(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Null => Some(f64::NAN),
        other => other.as_f64(),
    }
}

fn parse_int(value: &JsonValue) -> Option<i64> {
    value.as_i64()
}

/// RFC 3339 strings, naive ISO timestamps taken as UTC, or integer nanoseconds
fn parse_datetime(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
            .ok()
            .and_then(|dt| dt.and_utc().timestamp_nanos_opt()),
        other => other.as_i64(),
    }
}
