//! Table builder.
//!
//! A [`Table`] is either being created or altered. Column calls append a
//! column (create) or an [`Action::AddColumn`] (alter); every other call
//! appends exactly one [`Action`]. Nothing is validated against the
//! database: referenced columns and duplicate names are left to it.

use crate::column_builder::{Column, ColumnBuilder, DataType, DefaultValue};
use crate::foreign_key::ForeignKeyBuilder;
use crate::operation::{Action, Index};

/// Whether the table is created or altered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    /// `CREATE TABLE`.
    Create,
    /// `ALTER TABLE`.
    Alter,
}

/// A table under construction or alteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Create or alter.
    pub mode: TableMode,
    /// Columns of a created table, in declaration order.
    pub columns: Vec<Column>,
    /// Recorded actions, in call order.
    pub actions: Vec<Action>,
}

impl Table {
    /// Creates an empty table in create mode.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_mode(name, TableMode::Create)
    }

    /// Creates an empty table in alter mode.
    #[must_use]
    pub fn alter(name: impl Into<String>) -> Self {
        Self::with_mode(name, TableMode::Alter)
    }

    fn with_mode(name: impl Into<String>, mode: TableMode) -> Self {
        Self {
            name: name.into(),
            mode,
            columns: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Returns the columns added by this table, whichever the mode.
    pub fn added_columns(&self) -> impl Iterator<Item = &Column> {
        let added = self.actions.iter().filter_map(|action| match action {
            Action::AddColumn(column) => Some(column),
            _ => None,
        });
        self.columns.iter().chain(added)
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Appends a column and returns a builder for it.
    pub fn column(&mut self, name: impl Into<String>, data_type: DataType) -> ColumnBuilder<'_> {
        let column = Column::new(name, data_type);
        match self.mode {
            TableMode::Create => {
                self.columns.push(column);
                let last = self.columns.len() - 1;
                ColumnBuilder::new(&mut self.columns[last])
            }
            TableMode::Alter => {
                self.actions.push(Action::AddColumn(column));
                let Some(Action::AddColumn(column)) = self.actions.last_mut() else {
                    unreachable!("an AddColumn action was just pushed");
                };
                ColumnBuilder::new(column)
            }
        }
    }

    /// Adds a `varchar` column.
    pub fn string(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::Varchar)
    }

    /// Adds an `int` column.
    pub fn int(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::Int)
    }

    /// Adds a `bigint` column.
    pub fn big_int(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::BigInt)
    }

    /// Adds a `smallint` column.
    pub fn small_int(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::SmallInt)
    }

    /// Adds a `float` column.
    pub fn float(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::Float)
    }

    /// Adds a `double` column.
    pub fn double(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::Double)
    }

    /// Adds a `decimal` column.
    pub fn decimal(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::Decimal)
    }

    /// Adds a `boolean` column.
    pub fn boolean(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::Boolean)
    }

    /// Adds a `text` column.
    pub fn text(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::Text)
    }

    /// Adds a `date` column.
    pub fn date(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::Date)
    }

    /// Adds a `time` column.
    pub fn time(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::Time)
    }

    /// Adds a `timestamp` column.
    pub fn timestamp(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::Timestamp)
    }

    /// Adds a `uuid` column.
    pub fn uuid(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::Uuid)
    }

    /// Adds a `json` column.
    pub fn json(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::Json)
    }

    /// Adds a `jsonb` column.
    pub fn jsonb(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::Jsonb)
    }

    /// Adds a `binary` column.
    pub fn binary(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::Binary)
    }

    /// Adds an auto-incrementing integer primary key.
    pub fn increments(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::Serial).primary()
    }

    /// Adds an auto-incrementing bigint primary key.
    pub fn big_increments(&mut self, name: impl Into<String>) -> ColumnBuilder<'_> {
        self.column(name, DataType::BigSerial).primary()
    }

    /// Adds a column with a database-native type name (e.g. `"citext"`).
    pub fn specific_type(
        &mut self,
        name: impl Into<String>,
        type_name: &str,
    ) -> ColumnBuilder<'_> {
        self.column(name, DataType::from_name(type_name))
    }

    /// Adds `created_at` (timestamp, not null) and `updated_at` (timestamp).
    pub fn timestamps(&mut self) {
        self.timestamp("created_at").not_nullable();
        self.timestamp("updated_at");
    }

    // =========================================================================
    // Alterations
    // =========================================================================

    /// Drops a column.
    pub fn drop_column(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(Action::DropColumn(name.into()))
    }

    /// Renames a column.
    pub fn rename_column(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.push(Action::RenameColumn {
            from: from.into(),
            to: to.into(),
        })
    }

    /// Changes the type of a column.
    pub fn change_column_type(
        &mut self,
        name: impl Into<String>,
        data_type: impl Into<DataType>,
    ) -> &mut Self {
        self.push(Action::ChangeColumnType {
            column: name.into(),
            data_type: data_type.into(),
        })
    }

    /// Adds NOT NULL to a column.
    pub fn set_not_null(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(Action::SetColumnNotNull(name.into()))
    }

    /// Removes NOT NULL from a column.
    pub fn drop_not_null(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(Action::DropColumnNotNull(name.into()))
    }

    /// Sets the default value of a column.
    pub fn set_default(
        &mut self,
        name: impl Into<String>,
        value: impl Into<DefaultValue>,
    ) -> &mut Self {
        self.push(Action::SetColumnDefault {
            column: name.into(),
            value: value.into(),
        })
    }

    /// Removes the default value of a column.
    pub fn drop_default(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(Action::DropColumnDefault(name.into()))
    }

    /// Creates an index named `idx_<table>_<cols>`.
    ///
    /// # Panics
    ///
    /// Panics if `columns` is empty.
    pub fn index(&mut self, columns: &[&str]) -> &mut Self {
        let index = Index::new(&self.name, columns, false);
        self.push(Action::CreateIndex(index))
    }

    /// Creates an index with an explicit name.
    ///
    /// # Panics
    ///
    /// Panics if `columns` is empty.
    pub fn index_named(&mut self, name: impl Into<String>, columns: &[&str]) -> &mut Self {
        self.push(Action::CreateIndex(Index::named(name, columns, false)))
    }

    /// Creates a unique index named `uq_<table>_<cols>`.
    ///
    /// # Panics
    ///
    /// Panics if `columns` is empty.
    pub fn unique(&mut self, columns: &[&str]) -> &mut Self {
        let index = Index::new(&self.name, columns, true);
        self.push(Action::CreateIndex(index))
    }

    /// Starts a foreign key on `column`.
    ///
    /// A placeholder constraint is recorded immediately; every call on the
    /// returned builder rewrites that same action.
    pub fn foreign(&mut self, column: impl Into<String>) -> ForeignKeyBuilder<'_> {
        ForeignKeyBuilder::new(self, column.into())
    }

    fn push(&mut self, action: Action) -> &mut Self {
        self.actions.push(action);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::ForeignKeyAction;

    #[test]
    fn test_create_mode_appends_columns() {
        let mut table = Table::new("users");
        table.increments("id");
        table.string("email").length(255).not_nullable().unique();
        table.boolean("active").default(true);

        assert_eq!(table.mode, TableMode::Create);
        assert_eq!(table.columns.len(), 3);
        assert!(table.actions.is_empty());

        assert_eq!(table.columns[0].data_type, DataType::Serial);
        assert!(table.columns[0].primary_key);
        assert_eq!(table.columns[1].length, Some(255));
        assert!(table.columns[1].not_null && table.columns[1].unique);
        assert_eq!(
            table.columns[2].default,
            Some(DefaultValue::Boolean(true))
        );
    }

    #[test]
    fn test_alter_mode_appends_add_column_actions() {
        let mut table = Table::alter("users");
        table.string("nickname").nullable().comment("display name");

        assert!(table.columns.is_empty());
        assert_eq!(table.actions.len(), 1);
        let Action::AddColumn(column) = &table.actions[0] else {
            panic!("expected AddColumn, got {:?}", table.actions[0]);
        };
        assert_eq!(column.name, "nickname");
        assert_eq!(column.comment.as_deref(), Some("display name"));
        assert_eq!(table.added_columns().count(), 1);
    }

    #[test]
    fn test_timestamps() {
        let mut table = Table::new("posts");
        table.timestamps();

        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[0].name, "created_at");
        assert!(table.columns[0].not_null);
        assert_eq!(table.columns[1].name, "updated_at");
        assert!(!table.columns[1].not_null);
    }

    #[test]
    fn test_big_increments_and_specific_type() {
        let mut table = Table::new("events");
        table.big_increments("id");
        table.specific_type("tags", "text[]");

        assert_eq!(table.columns[0].data_type, DataType::BigSerial);
        assert!(table.columns[0].primary_key);
        assert_eq!(
            table.columns[1].data_type,
            DataType::Custom("text[]".to_string())
        );
    }

    #[test]
    fn test_alterations_are_ordered() {
        let mut table = Table::alter("t");
        table
            .rename_column("a", "b")
            .drop_column("c")
            .change_column_type("d", DataType::Text)
            .set_not_null("e")
            .drop_not_null("f")
            .set_default("g", "x")
            .drop_default("h");

        assert_eq!(
            table.actions,
            vec![
                Action::RenameColumn {
                    from: "a".into(),
                    to: "b".into()
                },
                Action::DropColumn("c".into()),
                Action::ChangeColumnType {
                    column: "d".into(),
                    data_type: DataType::Text
                },
                Action::SetColumnNotNull("e".into()),
                Action::DropColumnNotNull("f".into()),
                Action::SetColumnDefault {
                    column: "g".into(),
                    value: DefaultValue::String("x".into())
                },
                Action::DropColumnDefault("h".into()),
            ]
        );
    }

    #[test]
    fn test_indexes_on_created_table_are_actions() {
        let mut table = Table::new("users");
        table.string("email");
        table.index(&["email"]).unique(&["email"]);
        table.index_named("users_lookup", &["email", "id"]);

        assert_eq!(table.columns.len(), 1);
        let names: Vec<_> = table
            .actions
            .iter()
            .map(|action| match action {
                Action::CreateIndex(index) => index.name.as_str(),
                other => panic!("unexpected action {other:?}"),
            })
            .collect();
        assert_eq!(names, ["idx_users_email", "uq_users_email", "users_lookup"]);
    }

    #[test]
    fn test_foreign_key_rewrites_its_slot() {
        let mut table = Table::alter("posts");
        table.drop_column("legacy");
        table
            .foreign("user_id")
            .references("users", "id")
            .on_delete(ForeignKeyAction::Cascade);
        table.drop_column("other");

        assert_eq!(table.actions.len(), 3);
        let Action::AddForeignKey(fk) = &table.actions[1] else {
            panic!("expected AddForeignKey, got {:?}", table.actions[1]);
        };
        assert_eq!(fk.name, "fk_posts_user_id");
        assert_eq!(fk.ref_table, "users");
        assert_eq!(fk.on_delete, Some(ForeignKeyAction::Cascade));
    }
}
