//! Migration state tracking.
//!
//! [`MigrationState`] is the set of applied unit names, usually loaded from
//! the migrations table. It selects which registered units to run next.

use std::collections::HashSet;

use crate::error::MigrationError;
use crate::migration::Registration;
use crate::registry::Registry;

/// Tracks which migrations have been applied.
///
/// # Example
///
/// ```rust
/// use jone_core::MigrationState;
///
/// let mut state = MigrationState::new();
///
/// // Check if a migration is applied
/// assert!(!state.is_applied("1_initial"));
///
/// // Mark a migration as applied
/// state.mark_applied("1_initial");
/// assert!(state.is_applied("1_initial"));
///
/// // Mark a migration as unapplied (rolled back)
/// state.mark_unapplied("1_initial");
/// assert!(!state.is_applied("1_initial"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationState {
    /// Set of applied unit names.
    applied: HashSet<String>,
}

/// Status of one registered unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Unit name.
    pub name: &'static str,
    /// Unit alias.
    pub alias: String,
    /// Whether the unit has been applied.
    pub applied: bool,
}

impl MigrationState {
    /// Creates a new empty migration state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a migration state from a list of applied unit names.
    #[must_use]
    pub fn from_applied(applied: impl IntoIterator<Item = String>) -> Self {
        Self {
            applied: applied.into_iter().collect(),
        }
    }

    /// Checks if a unit has been applied.
    #[must_use]
    pub fn is_applied(&self, name: &str) -> bool {
        self.applied.contains(name)
    }

    /// Marks a unit as applied.
    pub fn mark_applied(&mut self, name: impl Into<String>) {
        self.applied.insert(name.into());
    }

    /// Marks a unit as unapplied (rolled back).
    pub fn mark_unapplied(&mut self, name: &str) {
        self.applied.remove(name);
    }

    /// Returns the number of applied units.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Returns the units not yet applied, in registry order.
    #[must_use]
    pub fn pending(&self, registry: &Registry) -> Vec<Registration> {
        registry
            .iter()
            .filter(|u| !self.is_applied(u.name()))
            .cloned()
            .collect()
    }

    /// Returns the applied units, in registry order.
    #[must_use]
    pub fn applied(&self, registry: &Registry) -> Vec<Registration> {
        registry
            .iter()
            .filter(|u| self.is_applied(u.name()))
            .cloned()
            .collect()
    }

    /// Selects the unit to apply next: `name` if given, otherwise the first
    /// pending unit. Returns `None` when nothing is pending.
    ///
    /// # Errors
    ///
    /// [`MigrationError::UnknownMigration`] if `name` is not registered,
    /// [`MigrationError::AlreadyApplied`] if it is already applied.
    pub fn next_pending(
        &self,
        registry: &Registry,
        name: Option<&str>,
    ) -> Result<Option<Registration>, MigrationError> {
        match name {
            Some(name) => {
                let unit = registry.require(name)?;
                if self.is_applied(name) {
                    return Err(MigrationError::AlreadyApplied(name.to_string()));
                }
                Ok(Some(unit.clone()))
            }
            None => Ok(registry
                .iter()
                .find(|u| !self.is_applied(u.name()))
                .cloned()),
        }
    }

    /// Selects the unit to revert: `name` if given, otherwise the last
    /// applied unit in registry order. Returns `None` when nothing is applied.
    ///
    /// # Errors
    ///
    /// [`MigrationError::UnknownMigration`] if `name` is not registered,
    /// [`MigrationError::NotApplied`] if it is not applied.
    pub fn last_applied(
        &self,
        registry: &Registry,
        name: Option<&str>,
    ) -> Result<Option<Registration>, MigrationError> {
        match name {
            Some(name) => {
                let unit = registry.require(name)?;
                if !self.is_applied(name) {
                    return Err(MigrationError::NotApplied(name.to_string()));
                }
                Ok(Some(unit.clone()))
            }
            None => Ok(registry
                .iter()
                .rev()
                .find(|u| self.is_applied(u.name()))
                .cloned()),
        }
    }

    /// Returns the status of every registered unit.
    #[must_use]
    pub fn status(&self, registry: &Registry) -> Vec<MigrationStatus> {
        registry
            .iter()
            .map(|u| MigrationStatus {
                name: u.name(),
                alias: u.alias().to_string(),
                applied: self.is_applied(u.name()),
            })
            .collect()
    }

    /// Returns applied names that are not in the registry, sorted.
    #[must_use]
    pub fn unknown_applied(&self, registry: &Registry) -> Vec<&str> {
        let mut unknown: Vec<&str> = self
            .applied
            .iter()
            .map(String::as_str)
            .filter(|name| registry.get(name).is_none())
            .collect();
        unknown.sort_unstable();
        unknown
    }
}
