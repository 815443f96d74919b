//! The schema handle passed to migration units.
//!
//! A unit's `up`/`down` records operations on a [`Schema`]; nothing touches a
//! database until the recorded operations are compiled with a [`Dialect`].

use crate::dialect::Dialect;
use crate::table_builder::Table;

/// A recorded schema operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaOp {
    /// Create a table.
    CreateTable(Table),
    /// Alter an existing table.
    AlterTable(Table),
    /// Drop a table.
    DropTable(String),
    /// Drop a table if it exists.
    DropTableIfExists(String),
    /// Rename a table.
    RenameTable {
        /// Current table name.
        from: String,
        /// New table name.
        to: String,
    },
    /// Raw SQL, passed through verbatim.
    Raw(String),
}

/// Ordered list of schema operations.
///
/// ```rust
/// use jone_core::{PostgresDialect, Schema};
///
/// let mut schema = Schema::new();
/// schema.create_table("users", |t| {
///     t.int("id").primary();
/// });
///
/// assert_eq!(
///     schema.to_sql(&PostgresDialect::new()),
///     ["CREATE TABLE \"users\" (\n  \"id\" INTEGER PRIMARY KEY\n);"]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    ops: Vec<SchemaOp>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a CREATE TABLE built by `build`.
    pub fn create_table<F>(&mut self, name: impl Into<String>, build: F) -> &mut Self
    where
        F: FnOnce(&mut Table),
    {
        let mut table = Table::new(name);
        build(&mut table);
        self.push(SchemaOp::CreateTable(table))
    }

    /// Records alterations of an existing table built by `build`.
    pub fn table<F>(&mut self, name: impl Into<String>, build: F) -> &mut Self
    where
        F: FnOnce(&mut Table),
    {
        let mut table = Table::alter(name);
        build(&mut table);
        self.push(SchemaOp::AlterTable(table))
    }

    /// Records a DROP TABLE.
    pub fn drop_table(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(SchemaOp::DropTable(name.into()))
    }

    /// Records a DROP TABLE IF EXISTS.
    pub fn drop_table_if_exists(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(SchemaOp::DropTableIfExists(name.into()))
    }

    /// Records a table rename.
    pub fn rename_table(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.push(SchemaOp::RenameTable {
            from: from.into(),
            to: to.into(),
        })
    }

    /// Records raw SQL.
    pub fn raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.push(SchemaOp::Raw(sql.into()))
    }

    /// Returns the recorded operations.
    #[must_use]
    pub fn ops(&self) -> &[SchemaOp] {
        &self.ops
    }

    /// Returns whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Compiles every recorded operation, in order.
    #[must_use]
    pub fn to_sql<D: Dialect + ?Sized>(&self, dialect: &D) -> Vec<String> {
        self.ops
            .iter()
            .flat_map(|op| dialect.generate_sql(op))
            .collect()
    }

    fn push(&mut self, op: SchemaOp) -> &mut Self {
        self.ops.push(op);
        self
    }
}
