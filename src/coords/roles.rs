//! Coordinate roles and the attribute tests that recognise them

use crate::dataset::{DType, Dataset, Variable};
use crate::units;

pub const VALID_LAT_UNITS: &[&str] = &[
    "degrees_north",
    "degree_north",
    "degree_N",
    "degrees_N",
    "degreeN",
    "degreesN",
];

pub const VALID_LON_UNITS: &[&str] = &[
    "degrees_east",
    "degree_east",
    "degree_E",
    "degrees_E",
    "degreeE",
    "degreesE",
];

/// Canonical units of CF time coordinates
pub const CF_TIME_UNITS: &str = "seconds since 1970-01-01T00:00:00+00:00";

/// Attribute test deciding whether a coordinate plays a role
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolePredicate {
    Latitude,
    Longitude,
    ForecastReferenceTime,
    ForecastPeriod,
    ValidTime,
    VerticalPressure,
    Realization,
    /// Matches coordinates whose `standard_name` equals the given value
    StandardName(String),
}

impl RolePredicate {
    pub fn matches(&self, coord: &Variable) -> bool {
        match self {
            Self::Latitude => coord.units().is_some_and(|u| VALID_LAT_UNITS.contains(&u)),
            Self::Longitude => coord.units().is_some_and(|u| VALID_LON_UNITS.contains(&u)),
            Self::ForecastReferenceTime => coord.standard_name() == Some("forecast_reference_time"),
            Self::ForecastPeriod => coord.standard_name() == Some("forecast_period"),
            Self::ValidTime => match coord.standard_name() {
                Some(name) => name == "time",
                None => {
                    coord.dtype() == DType::DateTime64 && !coord.attrs.contains_key("standard_name")
                }
            },
            Self::VerticalPressure => units::are_convertible(coord.units().unwrap_or(""), "Pa"),
            Self::Realization => coord.standard_name() == Some("realization"),
            Self::StandardName(expected) => coord.standard_name() == Some(expected.as_str()),
        }
    }

    /// Names of the coordinates of `dataset` matching this predicate, in
    /// dataset order
    pub fn matching_coords(&self, dataset: &Dataset) -> Vec<String> {
        dataset
            .coords()
            .filter(|coord| self.matches(coord))
            .map(|coord| coord.name.clone())
            .collect()
    }
}

/// A recognised role with its default canonical name and units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDescriptor {
    pub role: String,
    pub out_name: String,
    pub units: String,
    pub predicate: RolePredicate,
}

impl RoleDescriptor {
    pub fn new(role: &str, out_name: &str, units: &str, predicate: RolePredicate) -> Self {
        Self {
            role: role.to_string(),
            out_name: out_name.to_string(),
            units: units.to_string(),
            predicate,
        }
    }
}

/// Ordered set of roles applied by [`translate`](super::translate)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRegistry {
    roles: Vec<RoleDescriptor>,
}

impl RoleRegistry {
    /// A registry with no roles
    pub fn empty() -> Self {
        Self { roles: Vec::new() }
    }

    /// Add a role, or replace the role with the same identifier in place
    pub fn register(&mut self, descriptor: RoleDescriptor) {
        match self.roles.iter_mut().find(|r| r.role == descriptor.role) {
            Some(slot) => *slot = descriptor,
            None => self.roles.push(descriptor),
        }
    }

    #[must_use]
    pub fn with_role(mut self, descriptor: RoleDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn get(&self, role: &str) -> Option<&RoleDescriptor> {
        self.roles.iter().find(|r| r.role == role)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleDescriptor> {
        self.roles.iter()
    }

    pub fn role_ids(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.role.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::empty()
            .with_role(RoleDescriptor::new(
                "latitude",
                "latitude",
                "degrees_north",
                RolePredicate::Latitude,
            ))
            .with_role(RoleDescriptor::new(
                "longitude",
                "longitude",
                "degrees_east",
                RolePredicate::Longitude,
            ))
            .with_role(RoleDescriptor::new(
                "forecast_reference_time",
                "time",
                CF_TIME_UNITS,
                RolePredicate::ForecastReferenceTime,
            ))
            .with_role(RoleDescriptor::new(
                "forecast_period",
                "step",
                "h",
                RolePredicate::ForecastPeriod,
            ))
            .with_role(RoleDescriptor::new(
                "valid_time",
                "valid_time",
                CF_TIME_UNITS,
                RolePredicate::ValidTime,
            ))
            .with_role(RoleDescriptor::new(
                "vertical_pressure",
                "level",
                "hPa",
                RolePredicate::VerticalPressure,
            ))
            .with_role(RoleDescriptor::new(
                "realization",
                "number",
                "1",
                RolePredicate::Realization,
            ))
    }
}
