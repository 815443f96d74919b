//! # jone-core
//!
//! Schema changes described in code, compiled to dialect SQL.
//!
//! This crate provides:
//! - A fluent table/column builder that records every change as an ordered action
//! - A pluggable dialect compiler (PostgreSQL included)
//! - Migration units, an ordered registry and applied-state selection
//!
//! Nothing here performs I/O; executing the generated statements is the job
//! of `jone-migrate`.
//!
//! ## Writing a migration unit
//!
//! ```rust
//! use jone_core::{ForeignKeyAction, PostgresDialect, Schema};
//!
//! pub fn up(schema: &mut Schema) {
//!     schema.create_table("posts", |t| {
//!         t.increments("id");
//!         t.string("title").length(120).not_nullable();
//!         t.int("user_id").not_nullable();
//!         t.timestamps();
//!         t.foreign("user_id")
//!             .references("users", "id")
//!             .on_delete(ForeignKeyAction::Cascade);
//!     });
//! }
//!
//! pub fn down(schema: &mut Schema) {
//!     schema.drop_table("posts");
//! }
//!
//! let mut schema = Schema::new();
//! up(&mut schema);
//! let sql = schema.to_sql(&PostgresDialect::new());
//!
//! assert!(sql[0].starts_with("CREATE TABLE \"posts\" (\n  \"id\" SERIAL PRIMARY KEY,"));
//! assert_eq!(
//!     sql[1],
//!     "ALTER TABLE \"posts\" ADD CONSTRAINT \"fk_posts_user_id\" FOREIGN KEY (\"user_id\") \
//!      REFERENCES \"users\"(\"id\") ON DELETE CASCADE;"
//! );
//! ```

mod column_builder;
pub mod dialect;
mod error;
mod foreign_key;
mod migration;
mod operation;
mod registry;
mod schema;
mod state;
mod table_builder;

pub use column_builder::{Column, ColumnBuilder, ColumnReference, DataType, DefaultValue};
pub use dialect::{Dialect, PostgresDialect};
pub use error::MigrationError;
pub use foreign_key::ForeignKeyBuilder;
pub use migration::{Direction, Migration, MigrationFn, MigrationPlanner, Registration, UnitPlan};
pub use operation::{Action, ForeignKey, ForeignKeyAction, Index, ParseForeignKeyActionError};
pub use registry::{alias_for, compare_unit_names, is_unit_name, Registry};
pub use schema::{Schema, SchemaOp};
pub use state::{MigrationState, MigrationStatus};
pub use table_builder::{Table, TableMode};
