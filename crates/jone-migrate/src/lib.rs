//! Running jone migrations against a database.
//!
//! `jone-migrate` takes the units of a [`jone_core::Registry`] and applies or
//! reverts them in order:
//! - Each unit is compiled to SQL through a dialect and executed in its own
//!   transaction
//! - Applied units are tracked in a table (`jone_migrations` by default)
//! - The first failing unit stops the run; earlier units stay applied
//!
//! # Architecture
//!
//! - **Runner** - Ordered, fail-fast execution through a [`StatementExecutor`]
//! - **Executor** - `sqlx` transactions per unit, or a dry run printing SQL
//! - **History** - The tracking table
//! - **Migrator** - `latest`/`up`/`down`/`reset`/`status` on top of the above
//! - **Registry** - Generates `jone/migrations/registry/mod.rs` from unit folders
//! - **Scaffold** - `jone init` and `jone migrate:make`
//!
//! # Example
//!
//! ```rust,no_run
//! use jone_core::{PostgresDialect, Registration, Registry, Schema};
//! use jone_migrate::prelude::*;
//!
//! fn up(schema: &mut Schema) {
//!     schema.create_table("users", |t| {
//!         t.increments("id");
//!         t.string("email").not_nullable().unique();
//!     });
//! }
//!
//! fn down(schema: &mut Schema) {
//!     schema.drop_table("users");
//! }
//!
//! # async fn run() -> Result<()> {
//! let registry = Registry::new(vec![Registration::new("1_create_users", up, down)])?;
//! let config = Config::load("jone/jonefile.json".as_ref())?;
//! let pool = config.connect(None).await?;
//!
//! let migrator = Migrator::new(registry, PostgresDialect::new(), pool, "jone_migrations");
//! migrator.latest().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Scaffold the project and create a unit
//! jone init
//! jone migrate:make create_users
//!
//! # Apply pending migrations through the project's runner
//! cargo run --bin migrate -- migrate:latest
//!
//! # Roll back the last migration
//! cargo run --bin migrate -- migrate:down
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod history;
pub mod migrator;
pub mod project;
pub mod registry;
pub mod runner;
pub mod scaffold;

pub use runner::StatementExecutor;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{Client, Config, DEFAULT_MIGRATIONS_TABLE};
    pub use crate::error::{MigrateError, Result};
    pub use crate::executor::SqlxExecutor;
    pub use crate::history::{AppliedMigration, MigrationHistory};
    pub use crate::migrator::{Migrator, StatusEntry, StatusReport};
    pub use crate::project::Project;
    pub use crate::registry::MigrationInfo;
    pub use crate::runner::{DryRunExecutor, RunReport, Runner, StatementExecutor};
}
