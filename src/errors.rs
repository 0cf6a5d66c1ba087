//! Centralized error handling for cfcoords
//!
//! Every fallible operation in the crate returns [`Result`], so callers can
//! match on the failure kind (unit conversion, role conflict, naming conflict,
//! valid time derivation) instead of parsing messages.

use thiserror::Error;

/// Main error type for cfcoords operations
#[derive(Error, Debug)]
pub enum CfCoordsError {
    /// The unit pair cannot be resolved within any known rule table
    #[error("Cannot convert from '{source_unit}' to '{target_unit}'")]
    Conversion {
        source_unit: String,
        target_unit: String,
    },

    /// More than one coordinate matches a single role
    #[error("Found more than one CF coordinate with type '{role}'")]
    RoleConflict { role: String },

    /// The canonical name of a role is already used by another coordinate
    #[error("Found non CF compliant coordinate '{name}' with type '{role}'")]
    NamingConflict { role: String, name: String },

    /// Valid time cannot be derived from the coordinates present
    #[error("Cannot derive valid time: {0}")]
    Derivation(String),

    /// Coordinate or variable not found in the dataset
    #[error("Variable '{name}' not found in dataset")]
    CoordinateNotFound { name: String },

    /// Dimension not found in the dataset
    #[error("Dimension '{dim}' not found in dataset")]
    DimensionNotFound { dim: String },

    /// A rename or dimension swap targets a name already in use
    #[error("Name '{name}' is already used by a variable or dimension")]
    DuplicateName { name: String },

    /// Variable shape disagrees with its dimensions
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Arithmetic between two incompatible value types
    #[error("Cannot combine values of dtype '{left}' and '{right}'")]
    IncompatibleDtypes { left: String, right: String },

    /// Malformed dataset description
    #[error("Invalid dataset description: {0}")]
    InvalidFixture(String),

    /// Array shape or dimension error
    #[error("Array error: {0}")]
    ArrayError(#[from] ndarray::ShapeError),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Thread pool configuration error
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),
}

impl CfCoordsError {
    pub(crate) fn conversion(source_unit: &str, target_unit: &str) -> Self {
        CfCoordsError::Conversion {
            source_unit: source_unit.to_string(),
            target_unit: target_unit.to_string(),
        }
    }
}

/// Result type alias for cfcoords operations
pub type Result<T> = std::result::Result<T, CfCoordsError>;
