//! Error types for the migration system.

use std::path::PathBuf;

use jone_core::MigrationError;

/// Errors that can occur during migration operations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// Registry or selection error.
    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// A statement of a unit failed; the run stops here.
    #[error("Migration '{unit}' failed at statement {index}: {source}\n  SQL: {sql}")]
    Statement {
        /// The unit being run.
        unit: String,
        /// Zero-based index of the failing statement.
        index: usize,
        /// The failing statement.
        sql: String,
        /// The database error.
        #[source]
        source: sqlx::Error,
    },

    /// Database error outside of a unit's statements.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading/writing migration files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The migrations directory cannot be read.
    #[error("Cannot read migrations directory {path}: {source}")]
    MigrationsDirUnreadable {
        /// The directory.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// No Cargo package owns the project root.
    #[error("Cannot determine the crate name from {0}: expected a [package] with a name")]
    ModuleRootNotFound(PathBuf),

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The project has no `jone` folder or configuration file.
    #[error("{0} not found, run `jone init` first")]
    NotInitialized(PathBuf),

    /// Migration folder already exists.
    #[error("Migration already exists: {0}")]
    MigrationExists(PathBuf),

    /// The requested migration name cannot be used as a folder/module name.
    #[error("Invalid migration name '{0}': use lowercase letters, digits and '_'")]
    InvalidMigrationName(String),
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
