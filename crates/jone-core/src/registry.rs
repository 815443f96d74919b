//! The ordered registry of migration units.
//!
//! Unit names start with a numeric prefix (usually a `YYYYMMDDHHMMSS`
//! timestamp) followed by `_` and a slug. The registry orders units by that
//! prefix, compared as a number, and derives each unit's alias from it.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::MigrationError;
use crate::migration::Registration;

static UNIT_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+_").expect("Invalid unit name pattern"));

/// Returns whether `name` starts with a numeric prefix followed by `_`.
#[must_use]
pub fn is_unit_name(name: &str) -> bool {
    UNIT_NAME_PATTERN.is_match(name)
}

/// Derives the alias of a unit: `m` followed by everything before the first
/// `_` (or the whole name when there is none).
#[must_use]
pub fn alias_for(name: &str) -> String {
    match name.find('_') {
        Some(idx) if idx > 0 => format!("m{}", &name[..idx]),
        _ => format!("m{name}"),
    }
}

fn numeric_key(name: &str) -> (usize, &str) {
    let digits_end = name
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(name.len());
    let digits = name[..digits_end].trim_start_matches('0');
    (digits.len(), digits)
}

/// Orders unit names by numeric prefix, then by full name.
///
/// Prefixes are compared as numbers of arbitrary size, so `2_b` sorts
/// before `10_a`.
#[must_use]
pub fn compare_unit_names(a: &str, b: &str) -> Ordering {
    numeric_key(a).cmp(&numeric_key(b)).then_with(|| a.cmp(b))
}

/// Ordered, validated sequence of migration units.
///
/// ```rust
/// use jone_core::{Registration, Registry, Schema};
///
/// fn noop(_: &mut Schema) {}
///
/// let registry = Registry::new(vec![
///     Registration::new("2_b", noop, noop),
///     Registration::new("10_a", noop, noop),
///     Registration::new("1_c", noop, noop),
/// ])
/// .unwrap();
///
/// let names: Vec<_> = registry.iter().map(|u| u.name()).collect();
/// assert_eq!(names, ["1_c", "2_b", "10_a"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    units: Vec<Registration>,
}

impl Registry {
    /// Builds a registry, validating names and aliases and sorting units.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::InvalidName`] for a name without a numeric
    /// prefix and [`MigrationError::DuplicateAlias`] when two units share an
    /// alias.
    pub fn new(mut units: Vec<Registration>) -> Result<Self, MigrationError> {
        let mut seen: HashMap<&str, &'static str> = HashMap::new();
        for unit in &units {
            if !is_unit_name(unit.name()) {
                return Err(MigrationError::InvalidName(unit.name().to_string()));
            }
            if let Some(first) = seen.insert(unit.alias(), unit.name()) {
                return Err(MigrationError::DuplicateAlias {
                    alias: unit.alias().to_string(),
                    first: first.to_string(),
                    second: unit.name().to_string(),
                });
            }
        }
        drop(seen);

        units.sort_by(|a, b| compare_unit_names(a.name(), b.name()));
        Ok(Self { units })
    }

    /// Returns the units in run order.
    #[must_use]
    pub fn units(&self) -> &[Registration] {
        &self.units
    }

    /// Iterates the units in run order.
    pub fn iter(&self) -> std::slice::Iter<'_, Registration> {
        self.units.iter()
    }

    /// Returns the number of units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns whether the registry has no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Looks a unit up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Registration> {
        self.units.iter().find(|u| u.name() == name)
    }

    /// Looks a unit up by name, failing when it is not registered.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::UnknownMigration`].
    pub fn require(&self, name: &str) -> Result<&Registration, MigrationError> {
        self.get(name)
            .ok_or_else(|| MigrationError::UnknownMigration(name.to_string()))
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Registration;
    type IntoIter = std::slice::Iter<'a, Registration>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}
