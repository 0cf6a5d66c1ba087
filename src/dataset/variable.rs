//! Named, dimensioned variables and their typed values

use crate::errors::{CfCoordsError, Result};
use ndarray::{ArrayD, Axis, IxDyn};
use serde_json::Value as JsonValue;
use std::ops::Add;

/// Variable attributes, e.g. `units` or `standard_name`
pub type Attributes = serde_json::Map<String, JsonValue>;

/// Element type of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    Float64,
    Int64,
    /// Nanoseconds since 1970-01-01T00:00:00Z
    DateTime64,
    /// Nanoseconds
    TimeDelta64,
}

impl DType {
    /// Get the string representation of the dtype
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Float64 => "float64",
            Self::Int64 => "int64",
            Self::DateTime64 => "datetime64[ns]",
            Self::TimeDelta64 => "timedelta64[ns]",
        }
    }

    /// Parse a dtype name as produced by [`DType::as_str`]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "float64" => Some(Self::Float64),
            "int64" => Some(Self::Int64),
            "datetime64[ns]" => Some(Self::DateTime64),
            "timedelta64[ns]" => Some(Self::TimeDelta64),
            _ => None,
        }
    }
}

/// N-dimensional values of a variable
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Float(ArrayD<f64>),
    Int(ArrayD<i64>),
    DateTime(ArrayD<i64>),
    TimeDelta(ArrayD<i64>),
}

impl Values {
    #[must_use]
    pub const fn dtype(&self) -> DType {
        match self {
            Self::Float(_) => DType::Float64,
            Self::Int(_) => DType::Int64,
            Self::DateTime(_) => DType::DateTime64,
            Self::TimeDelta(_) => DType::TimeDelta64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Float(a) => a.shape(),
            Self::Int(a) | Self::DateTime(a) | Self::TimeDelta(a) => a.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric values as `float64`, for unit conversion
    ///
    /// # Errors
    ///
    /// Time values have no numeric unit and are rejected.
    pub fn into_float(self) -> Result<ArrayD<f64>> {
        match self {
            Self::Float(a) => Ok(a),
            Self::Int(a) => Ok(a.mapv(|v| v as f64)),
            other => Err(CfCoordsError::IncompatibleDtypes {
                left: other.dtype().as_str().to_string(),
                right: DType::Float64.as_str().to_string(),
            }),
        }
    }
}

impl From<ArrayD<f64>> for Values {
    fn from(values: ArrayD<f64>) -> Self {
        Values::Float(values)
    }
}

impl From<ArrayD<i64>> for Values {
    fn from(values: ArrayD<i64>) -> Self {
        Values::Int(values)
    }
}

/// A coordinate or data variable
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub dims: Vec<String>,
    pub values: Values,
    pub attrs: Attributes,
}

impl Variable {
    /// Create a variable, checking that `dims` names every axis of `values`
    pub fn new<S: AsRef<str>>(name: &str, dims: &[S], values: Values) -> Result<Self> {
        if dims.len() != values.ndim() {
            return Err(CfCoordsError::ShapeMismatch(format!(
                "variable '{name}' has {} dimension names for {} axes",
                dims.len(),
                values.ndim()
            )));
        }
        let dims: Vec<String> = dims.iter().map(|d| d.as_ref().to_string()).collect();
        for (i, dim) in dims.iter().enumerate() {
            if dims[..i].contains(dim) {
                return Err(CfCoordsError::ShapeMismatch(format!(
                    "variable '{name}' repeats dimension '{dim}'"
                )));
            }
        }
        Ok(Self {
            name: name.to_string(),
            dims,
            values,
            attrs: Attributes::new(),
        })
    }

    /// Create a 0-d variable
    pub fn scalar(name: &str, values: Values) -> Result<Self> {
        Self::new::<&str>(name, &[], values)
    }

    #[must_use]
    pub fn with_attr(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<JsonValue>) {
        self.attrs.insert(key.to_string(), value.into());
    }

    /// String attribute lookup; non-string values are ignored
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(JsonValue::as_str)
    }

    pub fn units(&self) -> Option<&str> {
        self.attr_str("units")
    }

    pub fn standard_name(&self) -> Option<&str> {
        self.attr_str("standard_name")
    }

    pub fn dtype(&self) -> DType {
        self.values.dtype()
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Element-wise sum, broadcasting by dimension name.
    ///
    /// The result carries the dimensions of `self` followed by the dimensions
    /// only `other` has, and no attributes. Adding a timedelta to a datetime
    /// yields a datetime.
    pub fn add(&self, other: &Variable, name: &str) -> Result<Variable> {
        let mut out_dims = self.dims.clone();
        let mut out_shape = self.shape().to_vec();
        for (dim, &len) in other.dims.iter().zip(other.shape()) {
            match out_dims.iter().position(|d| d == dim) {
                Some(i) if out_shape[i] != len => {
                    return Err(CfCoordsError::ShapeMismatch(format!(
                        "dimension '{dim}' has length {} in '{}' but {len} in '{}'",
                        out_shape[i], self.name, other.name
                    )));
                }
                Some(_) => {}
                None => {
                    out_dims.push(dim.clone());
                    out_shape.push(len);
                }
            }
        }

        let lhs = Operand::new(&self.dims, &out_dims, &out_shape);
        let rhs = Operand::new(&other.dims, &out_dims, &out_shape);
        let values = match (&self.values, &other.values) {
            (Values::DateTime(a), Values::TimeDelta(b))
            | (Values::TimeDelta(a), Values::DateTime(b)) => {
                Values::DateTime(broadcast_sum(a, &lhs, b, &rhs)?)
            }
            (Values::TimeDelta(a), Values::TimeDelta(b)) => {
                Values::TimeDelta(broadcast_sum(a, &lhs, b, &rhs)?)
            }
            (Values::Int(a), Values::Int(b)) => Values::Int(broadcast_sum(a, &lhs, b, &rhs)?),
            (left @ (Values::Float(_) | Values::Int(_)), right @ (Values::Float(_) | Values::Int(_))) => {
                let a = left.clone().into_float()?;
                let b = right.clone().into_float()?;
                Values::Float(broadcast_sum(&a, &lhs, &b, &rhs)?)
            }
            (left, right) => {
                return Err(CfCoordsError::IncompatibleDtypes {
                    left: left.dtype().as_str().to_string(),
                    right: right.dtype().as_str().to_string(),
                })
            }
        };

        let dims: Vec<&str> = out_dims.iter().map(String::as_str).collect();
        Variable::new(name, &dims, values)
    }
}

/// One side of a broadcast operation
struct Operand<'a> {
    dims: &'a [String],
    out_dims: &'a [String],
    out_shape: &'a [usize],
}

impl<'a> Operand<'a> {
    fn new(dims: &'a [String], out_dims: &'a [String], out_shape: &'a [usize]) -> Self {
        Self {
            dims,
            out_dims,
            out_shape,
        }
    }

    /// Reorder and expand `values` so its axes line up with the output dims
    fn broadcast<T: Clone>(&self, values: &ArrayD<T>) -> Result<ArrayD<T>> {
        let mut order: Vec<usize> = (0..self.dims.len()).collect();
        order.sort_by_key(|&axis| self.out_dims.iter().position(|d| *d == self.dims[axis]));
        let mut view = values.view().permuted_axes(order);
        for (axis, dim) in self.out_dims.iter().enumerate() {
            if !self.dims.contains(dim) {
                view = view.insert_axis(Axis(axis));
            }
        }
        let expanded = view.broadcast(IxDyn(self.out_shape)).ok_or_else(|| {
            CfCoordsError::ShapeMismatch(format!(
                "cannot broadcast {:?} to {:?}",
                self.dims, self.out_dims
            ))
        })?;
        Ok(expanded.to_owned())
    }
}

fn broadcast_sum<T>(a: &ArrayD<T>, lhs: &Operand, b: &ArrayD<T>, rhs: &Operand) -> Result<ArrayD<T>>
where
    T: Clone + Add<Output = T>,
{
    Ok(lhs.broadcast(a)? + rhs.broadcast(b)?)
}
