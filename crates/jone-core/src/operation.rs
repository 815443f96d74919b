//! Alteration actions recorded against a table.
//!
//! Actions are kept in the order the builder calls were made and compile to
//! exactly one SQL statement each, in that order.

use std::fmt;
use std::str::FromStr;

use crate::column_builder::{Column, DataType, DefaultValue};

/// A single recorded alteration of a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Add a column.
    AddColumn(Column),
    /// Drop a column by name.
    DropColumn(String),
    /// Rename a column.
    RenameColumn {
        /// Current column name.
        from: String,
        /// New column name.
        to: String,
    },
    /// Change the type of an existing column.
    ChangeColumnType {
        /// Column name.
        column: String,
        /// New data type.
        data_type: DataType,
    },
    /// `ALTER COLUMN .. SET NOT NULL`.
    SetColumnNotNull(String),
    /// `ALTER COLUMN .. DROP NOT NULL`.
    DropColumnNotNull(String),
    /// `ALTER COLUMN .. SET DEFAULT ..`.
    SetColumnDefault {
        /// Column name.
        column: String,
        /// New default value.
        value: DefaultValue,
    },
    /// `ALTER COLUMN .. DROP DEFAULT`.
    DropColumnDefault(String),
    /// Add a foreign key constraint.
    AddForeignKey(ForeignKey),
    /// Create an index.
    CreateIndex(Index),
}

/// Foreign key referential action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyAction {
    /// No action.
    NoAction,
    /// Restrict deletion/update.
    Restrict,
    /// Cascade the operation.
    Cascade,
    /// Set to NULL.
    SetNull,
    /// Set to default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// Returns the SQL representation of the action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

impl fmt::Display for ForeignKeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Error returned when parsing an unknown referential action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown foreign key action: {0}")]
pub struct ParseForeignKeyActionError(pub String);

impl FromStr for ForeignKeyAction {
    type Err = ParseForeignKeyActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('_', " ").as_str() {
            "NO ACTION" => Ok(Self::NoAction),
            "RESTRICT" => Ok(Self::Restrict),
            "CASCADE" => Ok(Self::Cascade),
            "SET NULL" => Ok(Self::SetNull),
            "SET DEFAULT" => Ok(Self::SetDefault),
            _ => Err(ParseForeignKeyActionError(s.to_string())),
        }
    }
}

/// A foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Table owning the constraint.
    pub table_name: String,
    /// Local column.
    pub column: String,
    /// Referenced table.
    pub ref_table: String,
    /// Referenced column.
    pub ref_column: String,
    /// Action on delete.
    pub on_delete: Option<ForeignKeyAction>,
    /// Action on update.
    pub on_update: Option<ForeignKeyAction>,
}

impl ForeignKey {
    /// Creates an empty foreign key on `table.column` named `fk_<table>_<column>`.
    #[must_use]
    pub fn new(table_name: impl Into<String>, column: impl Into<String>) -> Self {
        let table_name = table_name.into();
        let column = column.into();
        Self {
            name: format!("fk_{table_name}_{column}"),
            table_name,
            column,
            ref_table: String::new(),
            ref_column: String::new(),
            on_delete: None,
            on_update: None,
        }
    }

    /// Returns whether both the referenced table and column are set.
    #[must_use]
    pub fn is_referenced(&self) -> bool {
        !self.ref_table.is_empty() && !self.ref_column.is_empty()
    }
}

/// An index definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Indexed columns, in order.
    pub columns: Vec<String>,
    /// Whether this is a unique index.
    pub unique: bool,
}

impl Index {
    /// Creates an index on `table` with a derived name:
    /// `idx_<table>_<cols>` or `uq_<table>_<cols>` when unique.
    ///
    /// # Panics
    ///
    /// Panics if `columns` is empty.
    #[must_use]
    pub fn new(table: &str, columns: &[&str], unique: bool) -> Self {
        let prefix = if unique { "uq" } else { "idx" };
        let name = format!("{prefix}_{table}_{}", columns.join("_"));
        Self::named(name, columns, unique)
    }

    /// Creates an index with an explicit name.
    ///
    /// # Panics
    ///
    /// Panics if `columns` is empty.
    #[must_use]
    pub fn named(name: impl Into<String>, columns: &[&str], unique: bool) -> Self {
        assert!(!columns.is_empty(), "an index needs at least one column");
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            unique,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_key_default_name() {
        let fk = ForeignKey::new("posts", "user_id");
        assert_eq!(fk.name, "fk_posts_user_id");
        assert!(fk.ref_table.is_empty());
        assert!(fk.on_delete.is_none());
    }

    #[test]
    fn test_foreign_key_action_parse() {
        assert_eq!(
            "cascade".parse::<ForeignKeyAction>(),
            Ok(ForeignKeyAction::Cascade)
        );
        assert_eq!(
            "SET_NULL".parse::<ForeignKeyAction>(),
            Ok(ForeignKeyAction::SetNull)
        );
        assert_eq!(
            "no action".parse::<ForeignKeyAction>(),
            Ok(ForeignKeyAction::NoAction)
        );
        assert!("explode".parse::<ForeignKeyAction>().is_err());
        assert_eq!(ForeignKeyAction::SetDefault.to_string(), "SET DEFAULT");
    }

    #[test]
    fn test_index_names() {
        let idx = Index::new("users", &["email"], false);
        assert_eq!(idx.name, "idx_users_email");
        assert!(!idx.unique);

        let uq = Index::new("users", &["tenant_id", "email"], true);
        assert_eq!(uq.name, "uq_users_tenant_id_email");
        assert_eq!(uq.columns, vec!["tenant_id", "email"]);
    }

    #[test]
    #[should_panic(expected = "at least one column")]
    fn test_index_requires_columns() {
        let _ = Index::new("users", &[], false);
    }
}
