//! Table-driven conversion between equivalent physical units
//!
//! A [`RuleTable`] groups unit aliases that share one multiplicative factor
//! relative to the table's base unit. Only pressure units are known today,
//! see [`PRESSURE_CONVERSION_RULES`].

use crate::errors::{CfCoordsError, Result};
use std::ops::Mul;

/// Unit aliases sharing one factor relative to the base unit of their table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitGroup {
    pub aliases: &'static [&'static str],
    pub factor: f64,
}

impl UnitGroup {
    /// Exact, case sensitive alias lookup
    pub fn contains(&self, unit: &str) -> bool {
        self.aliases.iter().any(|alias| *alias == unit)
    }
}

/// A named set of unit groups expressed against the same base unit
///
/// Aliases must be unique across the groups of one table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleTable {
    pub name: &'static str,
    pub groups: &'static [UnitGroup],
}

impl RuleTable {
    /// Whether `unit` is an alias of any group in this table
    pub fn knows(&self, unit: &str) -> bool {
        self.groups.iter().any(|group| group.contains(unit))
    }
}

/// Pressure units relative to the pascal
pub const PRESSURE_CONVERSION_RULES: RuleTable = RuleTable {
    name: "pressure",
    groups: &[
        UnitGroup {
            aliases: &["Pa", "pascal"],
            factor: 1.0,
        },
        UnitGroup {
            aliases: &["hPa", "hectopascal", "hpascal", "millibar", "mbar"],
            factor: 100.0,
        },
        UnitGroup {
            aliases: &["decibar", "dbar"],
            factor: 10_000.0,
        },
        UnitGroup {
            aliases: &["bar"],
            factor: 100_000.0,
        },
        UnitGroup {
            aliases: &["atmosphere", "atm"],
            factor: 101_325.0,
        },
    ],
};

/// Rule tables tried by [`convert_units`], in priority order
pub const KNOWN_RULE_TABLES: &[RuleTable] = &[PRESSURE_CONVERSION_RULES];

/// Computes the magnitude of one `target_unit` expressed in `source_unit`.
///
/// Every group of `rules` is scanned: a group holding `source_unit` divides
/// the factor, a group holding `target_unit` multiplies it. Exactly two hits
/// are required over the whole table.
///
/// # Errors
///
/// Returns [`CfCoordsError::Conversion`] when either unit is unknown to the
/// table, or when a unit string is found in more than one group.
pub fn conversion_factor(source_unit: &str, target_unit: &str, rules: &RuleTable) -> Result<f64> {
    let mut factor = 1.0;
    let mut seen = 0;
    for group in rules.groups {
        if group.contains(source_unit) {
            factor /= group.factor;
            seen += 1;
        }
        if group.contains(target_unit) {
            factor *= group.factor;
            seen += 1;
        }
    }
    if seen != 2 {
        return Err(CfCoordsError::conversion(source_unit, target_unit));
    }
    Ok(factor)
}

/// Converts `value` from `source_unit` to `target_unit`.
///
/// Equal unit strings short-circuit and return `value` untouched. Otherwise
/// the first table of [`KNOWN_RULE_TABLES`] that resolves both units is used.
/// Works for plain `f64` values as well as owned `ndarray` arrays.
///
/// # Errors
///
/// Returns [`CfCoordsError::Conversion`] when no table relates the two units.
pub fn convert_units<V>(value: V, target_unit: &str, source_unit: &str) -> Result<V>
where
    V: Mul<f64, Output = V>,
{
    if target_unit == source_unit {
        return Ok(value);
    }
    let factor = KNOWN_RULE_TABLES
        .iter()
        .find_map(|rules| conversion_factor(target_unit, source_unit, rules).ok())
        .ok_or_else(|| CfCoordsError::conversion(source_unit, target_unit))?;
    Ok(value * factor)
}

/// Returns true when a value in `source_unit` can be expressed in `target_unit`
pub fn are_convertible(source_unit: &str, target_unit: &str) -> bool {
    convert_units(1.0_f64, source_unit, target_unit).is_ok()
}

/// Returns true when `unit` belongs to any of the [`KNOWN_RULE_TABLES`]
pub fn is_known_unit(unit: &str) -> bool {
    KNOWN_RULE_TABLES.iter().any(|rules| rules.knows(unit))
}
