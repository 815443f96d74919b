//! Dialect-specific SQL generation.
//!
//! A [`Dialect`] turns the schema model into an ordered list of SQL
//! statements. The trait carries the statement shapes as default methods;
//! a dialect supplies its type map and overrides whatever differs.
//! Generation is pure: the same input always yields the same statements.

mod postgres;

pub use postgres::PostgresDialect;

use crate::column_builder::{Column, DataType, DefaultValue};
use crate::operation::{Action, ForeignKey, Index};
use crate::schema::SchemaOp;
use crate::table_builder::Table;

/// Trait for dialect-specific SQL generation.
pub trait Dialect {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Maps a generic data type to the dialect's SQL type.
    fn map_data_type(&self, data_type: &DataType) -> String;

    /// Returns the SQL type of a column, honouring its length, precision and
    /// scale where the dialect supports them.
    fn column_type(&self, column: &Column) -> String {
        self.map_data_type(&column.data_type)
    }

    /// Renders a default value.
    fn render_default(&self, default: &DefaultValue) -> String {
        default.to_sql()
    }

    /// Returns the identifier quote character.
    fn quote_char(&self) -> char {
        '"'
    }

    /// Quotes an identifier, doubling any embedded quote character.
    fn quote_identifier(&self, name: &str) -> String {
        let q = self.quote_char();
        let escaped = name.replace(q, &format!("{q}{q}"));
        format!("{q}{escaped}{q}")
    }

    /// Generates the statements for one schema operation.
    fn generate_sql(&self, op: &SchemaOp) -> Vec<String> {
        match op {
            SchemaOp::CreateTable(table) => {
                let mut statements = vec![self.create_table_sql(table)];
                statements.extend(self.alter_table_sql(&table.name, &table.actions));
                statements.extend(self.comments_sql(table));
                statements
            }
            SchemaOp::AlterTable(table) => {
                let mut statements = self.alter_table_sql(&table.name, &table.actions);
                statements.extend(self.comments_sql(table));
                statements
            }
            SchemaOp::DropTable(name) => vec![self.drop_table_sql(name)],
            SchemaOp::DropTableIfExists(name) => vec![self.drop_table_if_exists_sql(name)],
            SchemaOp::RenameTable { from, to } => vec![self.rename_table_sql(from, to)],
            SchemaOp::Raw(sql) => vec![sql.clone()],
        }
    }

    /// Generates SQL for CREATE TABLE. Actions recorded on the table are not
    /// part of this statement.
    fn create_table_sql(&self, table: &Table) -> String {
        let definitions: Vec<String> = table
            .columns
            .iter()
            .map(|c| self.column_definition(c))
            .collect();
        format!(
            "CREATE TABLE {} (\n  {}\n);",
            self.quote_identifier(&table.name),
            definitions.join(",\n  ")
        )
    }

    /// Generates SQL for DROP TABLE.
    fn drop_table_sql(&self, name: &str) -> String {
        format!("DROP TABLE {};", self.quote_identifier(name))
    }

    /// Generates SQL for DROP TABLE IF EXISTS.
    fn drop_table_if_exists_sql(&self, name: &str) -> String {
        format!("DROP TABLE IF EXISTS {};", self.quote_identifier(name))
    }

    /// Generates SQL for renaming a table.
    fn rename_table_sql(&self, from: &str, to: &str) -> String {
        format!(
            "ALTER TABLE {} RENAME TO {};",
            self.quote_identifier(from),
            self.quote_identifier(to)
        )
    }

    /// Generates one statement per action, in order.
    ///
    /// A foreign key whose `references` was never set has nothing to point
    /// at and produces no statement.
    fn alter_table_sql(&self, table: &str, actions: &[Action]) -> Vec<String> {
        actions
            .iter()
            .filter(|action| match action {
                Action::AddForeignKey(fk) => fk.is_referenced(),
                _ => true,
            })
            .map(|action| self.action_sql(table, action))
            .collect()
    }

    /// Generates the statement for a single action.
    fn action_sql(&self, table: &str, action: &Action) -> String {
        let alter = format!("ALTER TABLE {}", self.quote_identifier(table));
        match action {
            Action::AddColumn(column) => {
                format!("{alter} ADD COLUMN {};", self.column_definition(column))
            }
            Action::DropColumn(name) => {
                format!("{alter} DROP COLUMN {};", self.quote_identifier(name))
            }
            Action::RenameColumn { from, to } => format!(
                "{alter} RENAME COLUMN {} TO {};",
                self.quote_identifier(from),
                self.quote_identifier(to)
            ),
            Action::ChangeColumnType { column, data_type } => format!(
                "{alter} ALTER COLUMN {} TYPE {};",
                self.quote_identifier(column),
                self.map_data_type(data_type)
            ),
            Action::SetColumnNotNull(name) => format!(
                "{alter} ALTER COLUMN {} SET NOT NULL;",
                self.quote_identifier(name)
            ),
            Action::DropColumnNotNull(name) => format!(
                "{alter} ALTER COLUMN {} DROP NOT NULL;",
                self.quote_identifier(name)
            ),
            Action::SetColumnDefault { column, value } => format!(
                "{alter} ALTER COLUMN {} SET DEFAULT {};",
                self.quote_identifier(column),
                self.render_default(value)
            ),
            Action::DropColumnDefault(name) => format!(
                "{alter} ALTER COLUMN {} DROP DEFAULT;",
                self.quote_identifier(name)
            ),
            Action::AddForeignKey(fk) => self.add_foreign_key_sql(table, fk),
            Action::CreateIndex(index) => self.create_index_sql(table, index),
        }
    }

    /// Generates SQL for ADD CONSTRAINT .. FOREIGN KEY.
    fn add_foreign_key_sql(&self, table: &str, fk: &ForeignKey) -> String {
        let mut sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({})",
            self.quote_identifier(table),
            self.quote_identifier(&fk.name),
            self.quote_identifier(&fk.column),
            self.quote_identifier(&fk.ref_table),
            self.quote_identifier(&fk.ref_column)
        );
        if let Some(action) = fk.on_delete {
            sql.push_str(" ON DELETE ");
            sql.push_str(action.as_sql());
        }
        if let Some(action) = fk.on_update {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action.as_sql());
        }
        sql.push(';');
        sql
    }

    /// Generates SQL for CREATE INDEX.
    fn create_index_sql(&self, table: &str, index: &Index) -> String {
        let columns: Vec<String> = index
            .columns
            .iter()
            .map(|c| self.quote_identifier(c))
            .collect();
        format!(
            "CREATE {}INDEX {} ON {} ({});",
            if index.unique { "UNIQUE " } else { "" },
            self.quote_identifier(&index.name),
            self.quote_identifier(table),
            columns.join(", ")
        )
    }

    /// Generates SQL for a column comment.
    fn comment_sql(&self, table: &str, column: &str, comment: &str) -> String {
        format!(
            "COMMENT ON COLUMN {}.{} IS '{}';",
            self.quote_identifier(table),
            self.quote_identifier(column),
            comment.replace('\'', "''")
        )
    }

    /// Generates comment statements for every commented column the table adds.
    fn comments_sql(&self, table: &Table) -> Vec<String> {
        table
            .added_columns()
            .filter_map(|column| {
                column
                    .comment
                    .as_deref()
                    .map(|comment| self.comment_sql(&table.name, &column.name, comment))
            })
            .collect()
    }

    /// Generates SQL for a column definition.
    fn column_definition(&self, col: &Column) -> String {
        let mut sql = format!(
            "{} {}",
            self.quote_identifier(&col.name),
            self.column_type(col)
        );

        if col.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else {
            if col.not_null {
                sql.push_str(" NOT NULL");
            }
            if col.unique {
                sql.push_str(" UNIQUE");
            }
        }

        if let Some(ref default) = col.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.render_default(default));
        }

        if let Some(ref reference) = col.references {
            if !reference.table.is_empty() && !reference.column.is_empty() {
                sql.push_str(&format!(
                    " REFERENCES {}({})",
                    self.quote_identifier(&reference.table),
                    self.quote_identifier(&reference.column)
                ));
            }
        }

        sql
    }
}
