//! Foreign key builder bound to a single action slot.

use crate::operation::{Action, ForeignKey, ForeignKeyAction};
use crate::table_builder::Table;

/// Builder for a foreign key recorded on a [`Table`].
///
/// Created by [`Table::foreign`], which appends a placeholder
/// [`Action::AddForeignKey`]. The builder keeps the index of that action and
/// rewrites it after every call, so the table always holds the latest
/// constraint even if the chain is abandoned midway.
///
/// ```rust
/// use jone_core::{Action, ForeignKeyAction, Table};
///
/// let mut table = Table::new("posts");
/// table
///     .foreign("user_id")
///     .references("users", "id")
///     .on_delete(ForeignKeyAction::Cascade);
///
/// let Action::AddForeignKey(fk) = &table.actions[0] else { unreachable!() };
/// assert_eq!(fk.name, "fk_posts_user_id");
/// ```
#[derive(Debug)]
pub struct ForeignKeyBuilder<'a> {
    table: &'a mut Table,
    slot: usize,
    foreign_key: ForeignKey,
}

impl<'a> ForeignKeyBuilder<'a> {
    pub(crate) fn new(table: &'a mut Table, column: String) -> Self {
        let foreign_key = ForeignKey::new(table.name.clone(), column);
        let slot = table.actions.len();
        table.actions.push(Action::AddForeignKey(foreign_key.clone()));
        Self {
            table,
            slot,
            foreign_key,
        }
    }

    /// Sets the referenced table and column.
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key.ref_table = table.into();
        self.foreign_key.ref_column = column.into();
        self.commit()
    }

    /// Sets the `ON DELETE` action.
    pub fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.foreign_key.on_delete = Some(action);
        self.commit()
    }

    /// Sets the `ON UPDATE` action.
    pub fn on_update(mut self, action: ForeignKeyAction) -> Self {
        self.foreign_key.on_update = Some(action);
        self.commit()
    }

    /// Overrides the derived constraint name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.foreign_key.name = name.into();
        self.commit()
    }

    /// Returns the constraint as built so far.
    #[must_use]
    pub const fn foreign_key(&self) -> &ForeignKey {
        &self.foreign_key
    }

    fn commit(self) -> Self {
        self.table.actions[self.slot] = Action::AddForeignKey(self.foreign_key.clone());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_foreign_key(table: &Table) -> &ForeignKey {
        assert_eq!(table.actions.len(), 1);
        match &table.actions[0] {
            Action::AddForeignKey(fk) => fk,
            other => panic!("expected AddForeignKey, got {other:?}"),
        }
    }

    #[test]
    fn test_placeholder_is_recorded_immediately() {
        let mut table = Table::new("posts");
        let _ = table.foreign("user_id");

        let fk = only_foreign_key(&table);
        assert_eq!(fk.name, "fk_posts_user_id");
        assert_eq!(fk.table_name, "posts");
        assert_eq!(fk.column, "user_id");
        assert!(fk.ref_table.is_empty());
    }

    #[test]
    fn test_every_call_updates_the_slot() {
        let mut table = Table::new("posts");
        table
            .foreign("author_id")
            .references("users", "id")
            .on_update(ForeignKeyAction::Restrict)
            .on_delete(ForeignKeyAction::SetNull)
            .name("posts_author_fk");

        let fk = only_foreign_key(&table);
        assert_eq!(fk.name, "posts_author_fk");
        assert_eq!(fk.ref_table, "users");
        assert_eq!(fk.ref_column, "id");
        assert_eq!(fk.on_update, Some(ForeignKeyAction::Restrict));
        assert_eq!(fk.on_delete, Some(ForeignKeyAction::SetNull));
    }

    #[test]
    fn test_two_builders_own_distinct_slots() {
        let mut table = Table::new("comments");
        table.foreign("post_id").references("posts", "id");
        table
            .foreign("user_id")
            .references("users", "id")
            .on_delete(ForeignKeyAction::Cascade);

        let names: Vec<_> = table
            .actions
            .iter()
            .map(|action| match action {
                Action::AddForeignKey(fk) => (fk.name.as_str(), fk.on_delete),
                other => panic!("unexpected action {other:?}"),
            })
            .collect();
        assert_eq!(
            names,
            [
                ("fk_comments_post_id", None),
                ("fk_comments_user_id", Some(ForeignKeyAction::Cascade)),
            ]
        );
    }
}
