//! Dataset inspection and coordinate description
//!
//! This module provides functions for examining a dataset's structure,
//! listing its dimensions and coordinates, and describing a coordinate in
//! detail. Datetime values are rendered as RFC 3339 and time deltas as
//! ISO 8601 durations.

use crate::dataset::{Attributes, DType, Dataset, Dimension, Values, Variable};
use crate::errors::{CfCoordsError, Result};
use chrono::{DateTime, Duration};
use serde_json::Value as JsonValue;

/// Number of leading values shown by [`describe_coordinate`]
const PREVIEW_LEN: usize = 6;

/// Structured metadata for a coordinate
#[derive(Debug, Clone)]
pub struct CoordinateSummary {
    pub name: String,
    pub dtype: DType,
    pub dimensions: Vec<Dimension>,
    pub attributes: Attributes,
    pub total_elements: usize,
    pub preview: Vec<String>,
}

/// Prints global attributes and variables of a dataset.
pub fn print_metadata(dataset: &Dataset) {
    println!("\n===== Global Attributes =====");
    for (name, value) in &dataset.attrs {
        println!("- {}: {}", name, render_attr(value));
    }

    println!("\n===== Variables =====");
    for var in dataset.coords().chain(dataset.data_vars()) {
        let dims: Vec<String> = var
            .dims
            .iter()
            .zip(var.shape())
            .map(|(d, len)| format!("{d}[{len}]"))
            .collect();
        println!("- {} ({})", var.name, dims.join(", "));
    }
}

/// Lists all dimensions and coordinates in a clean, organized format.
pub fn list_coordinates(dataset: &Dataset) {
    println!("\n Dimensions");
    println!("==============");

    let mut dimensions: Vec<&Dimension> = dataset.dims().iter().collect();
    dimensions.sort_by(|a, b| a.name.cmp(&b.name));

    if dimensions.is_empty() {
        println!("   (No dimensions found)");
    } else {
        for dim in dimensions {
            println!("    {} = {}", dim.name, dim.length);
        }
    }

    println!("\n Coordinates");
    println!("===============");

    let coords: Vec<&Variable> = dataset.coords().collect();
    if coords.is_empty() {
        println!("   (No coordinates found)");
    }
    for coord in coords {
        let index = if dataset.is_dim(&coord.name) { "*" } else { " " };
        if coord.dims.is_empty() {
            println!("  {} {} ({}): scalar", index, coord.name, coord.dtype().as_str());
        } else {
            let shape: Vec<String> = coord.shape().iter().map(|s| s.to_string()).collect();
            println!(
                "  {} {} ({}): [{}] = ({})",
                index,
                coord.name,
                coord.dtype().as_str(),
                coord.dims.join(", "),
                shape.join(" × ")
            );
        }

        let key_attrs: Vec<String> = ["standard_name", "units", "long_name"]
            .iter()
            .filter_map(|key| coord.attr_str(key).map(|value| format!("{key}: {value}")))
            .collect();
        if !key_attrs.is_empty() {
            println!("      └─ {}", key_attrs.join(", "));
        }
    }

    let data_vars: Vec<String> = dataset.data_vars().map(|v| v.name.clone()).collect();
    if !data_vars.is_empty() {
        println!("\n Data variables: {}", data_vars.join(", "));
    }
}

/// Describes a specific coordinate showing its dtype, shape, attributes and
/// leading values.
pub fn describe_coordinate(dataset: &Dataset, name: &str) -> Result<()> {
    let summary = coordinate_summary(dataset, name)?;

    println!("\n Coordinate Description: {}", summary.name);
    println!("={}", "=".repeat(summary.name.len() + 25));
    println!(" Data type: {}", summary.dtype.as_str());

    if summary.dimensions.is_empty() {
        println!(" Dimensions: (scalar)");
    } else {
        let dims: Vec<String> = summary
            .dimensions
            .iter()
            .map(|d| format!("{} = {}", d.name, d.length))
            .collect();
        println!(" Dimensions: [{}]", dims.join(", "));
    }

    if summary.attributes.is_empty() {
        println!("\n  Attributes: (none)");
    } else {
        println!("\n  Attributes:");
        for (key, value) in &summary.attributes {
            println!("   • {}: {}", key, render_attr(value));
        }
    }

    println!("\n Values ({} total):", summary.total_elements);
    let ellipsis = if summary.total_elements > summary.preview.len() { ", …" } else { "" };
    println!("    [{}{}]", summary.preview.join(", "), ellipsis);

    Ok(())
}

/// Get structured metadata for a coordinate
pub fn coordinate_summary(dataset: &Dataset, name: &str) -> Result<CoordinateSummary> {
    let coord = dataset
        .coord(name)
        .ok_or_else(|| CfCoordsError::CoordinateNotFound {
            name: name.to_string(),
        })?;

    let dimensions = coord
        .dims
        .iter()
        .zip(coord.shape())
        .map(|(dim, &length)| Dimension {
            name: dim.clone(),
            length,
        })
        .collect();

    Ok(CoordinateSummary {
        name: coord.name.clone(),
        dtype: coord.dtype(),
        dimensions,
        attributes: coord.attrs.clone(),
        total_elements: coord.len(),
        preview: preview_values(&coord.values, PREVIEW_LEN),
    })
}

/// Render the first `limit` values in logical order
pub fn preview_values(values: &Values, limit: usize) -> Vec<String> {
    match values {
        Values::Float(a) => a.iter().take(limit).map(|v| v.to_string()).collect(),
        Values::Int(a) => a.iter().take(limit).map(|v| v.to_string()).collect(),
        Values::DateTime(a) => a.iter().take(limit).map(|&ns| format_datetime(ns)).collect(),
        Values::TimeDelta(a) => a
            .iter()
            .take(limit)
            .map(|&ns| Duration::nanoseconds(ns).to_string())
            .collect(),
    }
}

/// Format nanoseconds since the epoch as RFC 3339
pub fn format_datetime(ns: i64) -> String {
    let secs = ns.div_euclid(1_000_000_000);
    let nanos = ns.rem_euclid(1_000_000_000) as u32;
    DateTime::from_timestamp(secs, nanos)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| format!("{ns}ns"))
}

fn render_attr(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => format!("\"{s}\""),
        other => other.to_string(),
    }
}
