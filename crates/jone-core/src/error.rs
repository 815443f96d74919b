//! Registry and selection errors.

use thiserror::Error;

/// Errors raised while assembling a registry or selecting units from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrationError {
    /// A unit name does not start with a numeric prefix followed by `_`.
    #[error(
        "invalid migration name '{0}': expected a numeric prefix followed by '_' \
         (e.g. 20260114035749_create_users)"
    )]
    InvalidName(String),

    /// Two units derive the same alias.
    #[error("migrations '{first}' and '{second}' share the alias '{alias}'")]
    DuplicateAlias {
        /// The shared alias.
        alias: String,
        /// The unit registered first.
        first: String,
        /// The unit registered second.
        second: String,
    },

    /// The requested unit is not in the registry.
    #[error("migration not found: {0}")]
    UnknownMigration(String),

    /// The requested unit is already applied.
    #[error("migration '{0}' is already applied")]
    AlreadyApplied(String),

    /// The requested unit has not been applied.
    #[error("migration '{0}' is not applied")]
    NotApplied(String),
}
