//! In-memory labeled dataset
//!
//! A [`Dataset`] holds named dimensions, coordinate variables and data
//! variables, the way decoded GRIB messages are presented to CF tooling.
//! It offers the handful of operations coordinate translation needs:
//! coordinate enumeration, attribute access, rename, dimension swap, and
//! broadcast arithmetic through [`Variable::add`].
//!
//! # Organization
//!
//! - [`variable`]: variables, dtypes and value arrays

pub mod variable;

pub use variable::{Attributes, DType, Values, Variable};

use crate::errors::{CfCoordsError, Result};

/// Information about a dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub length: usize,
}

/// Dimensions, coordinates and data variables, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    dims: Vec<Dimension>,
    coords: Vec<Variable>,
    data_vars: Vec<Variable>,
    pub attrs: Attributes,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the length of a dimension before any variable uses it
    pub fn with_dim(mut self, name: &str, length: usize) -> Result<Self> {
        match self.dim_len(name) {
            Some(existing) if existing != length => {
                return Err(CfCoordsError::ShapeMismatch(format!(
                    "dimension '{name}' already has length {existing}, not {length}"
                )))
            }
            Some(_) => {}
            None => self.dims.push(Dimension {
                name: name.to_string(),
                length,
            }),
        }
        Ok(self)
    }

    pub fn with_coord(mut self, coord: Variable) -> Result<Self> {
        self.set_coord(coord)?;
        Ok(self)
    }

    pub fn with_data_var(mut self, var: Variable) -> Result<Self> {
        self.set_data_var(var)?;
        Ok(self)
    }

    /// Insert or replace a coordinate
    pub fn set_coord(&mut self, coord: Variable) -> Result<()> {
        if self.data_var(&coord.name).is_some() {
            return Err(CfCoordsError::DuplicateName { name: coord.name });
        }
        self.register_dims(&coord)?;
        match self.coords.iter_mut().find(|c| c.name == coord.name) {
            Some(slot) => *slot = coord,
            None => self.coords.push(coord),
        }
        Ok(())
    }

    /// Insert or replace a data variable
    pub fn set_data_var(&mut self, var: Variable) -> Result<()> {
        if self.has_coord(&var.name) {
            return Err(CfCoordsError::DuplicateName { name: var.name });
        }
        self.register_dims(&var)?;
        match self.data_vars.iter_mut().find(|v| v.name == var.name) {
            Some(slot) => *slot = var,
            None => self.data_vars.push(var),
        }
        Ok(())
    }

    // Validate every axis first so a mismatch leaves the dataset untouched
    fn register_dims(&mut self, var: &Variable) -> Result<()> {
        for (dim, &len) in var.dims.iter().zip(var.shape()) {
            if let Some(existing) = self.dim_len(dim) {
                if existing != len {
                    return Err(CfCoordsError::ShapeMismatch(format!(
                        "variable '{}' has length {len} along '{dim}', dataset has {existing}",
                        var.name
                    )));
                }
            }
        }
        for (dim, &len) in var.dims.iter().zip(var.shape()) {
            if !self.is_dim(dim) {
                self.dims.push(Dimension {
                    name: dim.clone(),
                    length: len,
                });
            }
        }
        Ok(())
    }

    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    pub fn dim_len(&self, name: &str) -> Option<usize> {
        self.dims.iter().find(|d| d.name == name).map(|d| d.length)
    }

    /// Whether `name` is a dimension of the dataset
    pub fn is_dim(&self, name: &str) -> bool {
        self.dims.iter().any(|d| d.name == name)
    }

    pub fn coords(&self) -> impl Iterator<Item = &Variable> {
        self.coords.iter()
    }

    pub fn coord_names(&self) -> Vec<&str> {
        self.coords.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn coord(&self, name: &str) -> Option<&Variable> {
        self.coords.iter().find(|c| c.name == name)
    }

    pub fn coord_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.coords.iter_mut().find(|c| c.name == name)
    }

    pub fn has_coord(&self, name: &str) -> bool {
        self.coord(name).is_some()
    }

    pub fn data_vars(&self) -> impl Iterator<Item = &Variable> {
        self.data_vars.iter()
    }

    pub fn data_var(&self, name: &str) -> Option<&Variable> {
        self.data_vars.iter().find(|v| v.name == name)
    }

    fn variables_mut(&mut self) -> impl Iterator<Item = &mut Variable> {
        self.coords.iter_mut().chain(self.data_vars.iter_mut())
    }

    /// Rename a variable, and the dimension of the same name if there is one.
    ///
    /// # Errors
    ///
    /// - [`CfCoordsError::CoordinateNotFound`] if neither a variable nor a
    ///   dimension is called `old`
    /// - [`CfCoordsError::DuplicateName`] if `new` is already taken
    pub fn rename(mut self, old: &str, new: &str) -> Result<Self> {
        if old == new {
            return Ok(self);
        }
        let has_var = self.has_coord(old) || self.data_var(old).is_some();
        let has_dim = self.is_dim(old);
        if !has_var && !has_dim {
            return Err(CfCoordsError::CoordinateNotFound {
                name: old.to_string(),
            });
        }
        let taken = (has_var && (self.has_coord(new) || self.data_var(new).is_some()))
            || (has_dim && self.is_dim(new));
        if taken {
            return Err(CfCoordsError::DuplicateName {
                name: new.to_string(),
            });
        }

        if let Some(var) = self.variables_mut().find(|v| v.name == old) {
            var.name = new.to_string();
        }
        if has_dim {
            self.rename_dim(old, new);
        }
        Ok(self)
    }

    /// Make the 1-d coordinate `new_dim`, which lies along `old_dim`, the
    /// index of that dimension.
    ///
    /// Every variable indexed by `old_dim` is re-indexed by `new_dim`; the
    /// coordinate that used to index `old_dim` is kept as a plain coordinate.
    pub fn swap_dims(mut self, old_dim: &str, new_dim: &str) -> Result<Self> {
        if !self.is_dim(old_dim) {
            return Err(CfCoordsError::DimensionNotFound {
                dim: old_dim.to_string(),
            });
        }
        if self.is_dim(new_dim) {
            return Err(CfCoordsError::DuplicateName {
                name: new_dim.to_string(),
            });
        }
        let coord = self
            .coord(new_dim)
            .ok_or_else(|| CfCoordsError::CoordinateNotFound {
                name: new_dim.to_string(),
            })?;
        if coord.dims != [old_dim] {
            return Err(CfCoordsError::ShapeMismatch(format!(
                "replacement coordinate '{new_dim}' must be 1-d along '{old_dim}', found {:?}",
                coord.dims
            )));
        }
        self.rename_dim(old_dim, new_dim);
        Ok(self)
    }

    fn rename_dim(&mut self, old: &str, new: &str) {
        if let Some(dim) = self.dims.iter_mut().find(|d| d.name == old) {
            dim.name = new.to_string();
        }
        for var in self.variables_mut() {
            for dim in var.dims.iter_mut() {
                if *dim == old {
                    *dim = new.to_string();
                }
            }
        }
    }
}
