//! cfcoords: CF-convention coordinate normalization for decoded GRIB datasets
//!
//! Gridded meteorological data decoded from GRIB carries coordinates whose
//! names and units depend on the producer: a latitude axis may be called
//! `lat`, `g0_lat_0` or `latitude` and use `degrees_north` or `degreeN`.
//! cfcoords recognises coordinates by their attributes, renames them to the
//! canonical CF names, converts their units and derives `valid_time` from
//! the forecast reference time and forecast period.
//!
//! ## Key Features
//!
//! - **Role Recognition**: latitude, longitude, reference time, forecast period,
//!   valid time, pressure level and ensemble member, from attributes only
//! - **Unit Conversion**: table-driven pressure unit conversion
//! - **Valid Time**: derived from `time + step` and promoted to a dimension
//! - **Overrides**: canonical names and units configurable per call or from JSON
//! - **Batch Processing**: many datasets translated in parallel with Rayon
//!
//! ## Module Organization
//!
//! - [`units`]: unit equivalence tables and conversion
//! - [`dataset`]: the labeled dataset the translation operates on
//! - [`coords`]: role recognition, translation and valid time handling
//! - [`loader`]: datasets from JSON descriptions
//! - [`metadata`]: dataset inspection and coordinate description
//! - [`parallel`]: parallel processing configuration and batch translation
//! - [`errors`]: centralized error handling
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use cfcoords::prelude::*;
//! use ndarray::{arr1, ArrayD, IxDyn};
//!
//! fn main() -> cfcoords::Result<()> {
//!     let lat = Variable::new("lat", &["lat"], Values::Float(arr1(&[10.0, 20.0]).into_dyn()))?
//!         .with_attr("units", "degreeN");
//!     let level = Variable::new("lev", &["lev"], Values::Float(arr1(&[50000.0]).into_dyn()))?
//!         .with_attr("units", "Pa");
//!     let dataset = Dataset::new().with_coord(lat)?.with_coord(level)?;
//!
//!     let dataset = translate(dataset, &CoordModel::default(), &RoleRegistry::default())?;
//!     assert!(dataset.has_coord("latitude"));
//!     assert_eq!(dataset.coord("level").map(|c| c.values.clone()),
//!                Some(Values::Float(ArrayD::from_elem(IxDyn(&[1]), 500.0))));
//!     Ok(())
//! }
//! ```
//!
//! Operations take the dataset by value and hand back the translated one.

// Core modules
pub mod coords;
pub mod dataset;
pub mod errors;
pub mod loader;
pub mod metadata;
pub mod parallel;
pub mod units;

// Direct re-exports for the public API
pub use coords::{
    apply_role, ensure_valid_time, ensure_valid_time_present, translate, translate_default,
    CoordModel, RoleDescriptor, RolePredicate, RoleRegistry, ValidTimeNames,
};
pub use dataset::{Dataset, Values, Variable};
pub use errors::{CfCoordsError, Result};
pub use units::{are_convertible, convert_units};

// High-level convenience API
pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::coords::{
        ensure_valid_time, ensure_valid_time_present, translate, CoordModel, RoleDescriptor,
        RolePredicate, RoleRegistry, ValidTimeNames,
    };
    pub use crate::dataset::{DType, Dataset, Values, Variable};
    pub use crate::errors::{CfCoordsError, Result};
    pub use crate::parallel::{BatchOptions, ParallelConfig};
    pub use crate::units::{are_convertible, convert_units};
}
