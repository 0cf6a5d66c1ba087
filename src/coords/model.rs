//! Per-invocation overrides of canonical coordinate names and units
//!
//! A coordinate model is usually loaded from JSON:
//!
//! ```json
//! { "vertical_pressure": { "out_name": "isobaricInhPa", "units": "Pa" } }
//! ```

use super::roles::RoleDescriptor;
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Canonical name and units replacing a role's defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

/// Role identifier to override mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordModel {
    roles: HashMap<String, RoleOverride>,
}

impl CoordModel {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_out_name(mut self, role: &str, out_name: &str) -> Self {
        self.roles.entry(role.to_string()).or_default().out_name = Some(out_name.to_string());
        self
    }

    #[must_use]
    pub fn with_units(mut self, role: &str, units: &str) -> Self {
        self.roles.entry(role.to_string()).or_default().units = Some(units.to_string());
        self
    }

    pub fn get(&self, role: &str) -> Option<&RoleOverride> {
        self.roles.get(role)
    }

    /// Canonical name for `descriptor`, overridden or default
    pub fn out_name<'a>(&'a self, descriptor: &'a RoleDescriptor) -> &'a str {
        self.get(&descriptor.role)
            .and_then(|o| o.out_name.as_deref())
            .unwrap_or(&descriptor.out_name)
    }

    /// Canonical units for `descriptor`, overridden or default
    pub fn units<'a>(&'a self, descriptor: &'a RoleDescriptor) -> &'a str {
        self.get(&descriptor.role)
            .and_then(|o| o.units.as_deref())
            .unwrap_or(&descriptor.units)
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
