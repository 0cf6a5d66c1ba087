//! CF coordinate recognition and translation
//!
//! Coordinates are classified by role from their attributes, never from
//! their names, then renamed to the canonical CF name of the role and
//! converted to its canonical units.
//!
//! # Organization
//!
//! This module is organized into submodules:
//! - [`roles`]: role predicates and the role registry
//! - [`model`]: per-invocation overrides of canonical names and units
//! - [`translate`]: applying roles to a dataset
//! - [`valid_time`]: deriving and indexing the `valid_time` coordinate

pub mod model;
pub mod roles;
pub mod translate;
pub mod valid_time;

pub use model::{CoordModel, RoleOverride};
pub use roles::{RoleDescriptor, RolePredicate, RoleRegistry, CF_TIME_UNITS};
pub use translate::{apply_role, translate, translate_default};
pub use valid_time::{ensure_valid_time, ensure_valid_time_present, ValidTimeNames, DEFAULT_VALID_TIME_NAME};
