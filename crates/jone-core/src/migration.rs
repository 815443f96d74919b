//! Migration units and their compilation into statement plans.

use std::fmt;

use crate::dialect::Dialect;
use crate::registry::alias_for;
use crate::schema::Schema;

/// Signature of a unit's `up`/`down` function.
pub type MigrationFn = fn(&mut Schema);

/// A database migration with reversible schema changes.
///
/// Units are usually plain `up`/`down` functions in a module picked up by
/// the registry generator; this trait is the typed alternative.
///
/// # Example
///
/// ```rust
/// use jone_core::{Migration, Registration, Schema};
///
/// pub struct CreateUsers;
///
/// impl Migration for CreateUsers {
///     const NAME: &'static str = "20260114035749_create_users";
///
///     fn up(schema: &mut Schema) {
///         schema.create_table("users", |t| {
///             t.increments("id");
///             t.string("email").not_nullable().unique();
///         });
///     }
///
///     fn down(schema: &mut Schema) {
///         schema.drop_table("users");
///     }
/// }
///
/// let unit = Registration::of::<CreateUsers>();
/// assert_eq!(unit.alias(), "m20260114035749");
/// ```
pub trait Migration {
    /// Unit name: a numeric prefix, `_`, then a slug.
    ///
    /// The name is stored in the migrations table to track which units have
    /// been applied.
    const NAME: &'static str;

    /// Apply the migration (forward).
    fn up(schema: &mut Schema);

    /// Reverse the migration (backward).
    fn down(schema: &mut Schema);
}

/// Direction a unit is run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Apply.
    Up,
    /// Revert.
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// A registered migration unit.
#[derive(Clone)]
pub struct Registration {
    name: &'static str,
    alias: String,
    up: MigrationFn,
    down: MigrationFn,
}

impl Registration {
    /// Registers a unit from its name and functions.
    #[must_use]
    pub fn new(name: &'static str, up: MigrationFn, down: MigrationFn) -> Self {
        Self {
            name,
            alias: alias_for(name),
            up,
            down,
        }
    }

    /// Registers a [`Migration`] implementor.
    #[must_use]
    pub fn of<M: Migration>() -> Self {
        Self::new(M::NAME, M::up, M::down)
    }

    /// Returns the unit name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the alias derived from the numeric prefix.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Runs `up` or `down` against a fresh schema.
    #[must_use]
    pub fn schema(&self, direction: Direction) -> Schema {
        let mut schema = Schema::new();
        match direction {
            Direction::Up => (self.up)(&mut schema),
            Direction::Down => (self.down)(&mut schema),
        }
        schema
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}

/// The statements a unit compiles to in one direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPlan {
    /// Unit name.
    pub name: &'static str,
    /// Unit alias.
    pub alias: String,
    /// Direction the statements run in.
    pub direction: Direction,
    /// Statements, in execution order.
    pub statements: Vec<String>,
}

/// Compiles units into [`UnitPlan`]s with a dialect.
///
/// ```rust
/// use jone_core::{Direction, MigrationPlanner, PostgresDialect, Registration, Schema};
///
/// fn up(schema: &mut Schema) {
///     schema.rename_table("a", "b");
/// }
/// fn down(schema: &mut Schema) {
///     schema.rename_table("b", "a");
/// }
///
/// let planner = MigrationPlanner::new(PostgresDialect::new());
/// let plan = planner.plan(&Registration::new("1_rename", up, down), Direction::Down);
/// assert_eq!(plan.statements, ["ALTER TABLE \"b\" RENAME TO \"a\";"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MigrationPlanner<D: Dialect> {
    dialect: D,
}

impl<D: Dialect> MigrationPlanner<D> {
    /// Creates a planner for the given dialect.
    #[must_use]
    pub const fn new(dialect: D) -> Self {
        Self { dialect }
    }

    /// Returns the dialect.
    #[must_use]
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Compiles one unit.
    #[must_use]
    pub fn plan(&self, unit: &Registration, direction: Direction) -> UnitPlan {
        UnitPlan {
            name: unit.name(),
            alias: unit.alias().to_string(),
            direction,
            statements: unit.schema(direction).to_sql(&self.dialect),
        }
    }

    /// Compiles units in run order: as given for [`Direction::Up`], reversed
    /// for [`Direction::Down`].
    #[must_use]
    pub fn plan_all(&self, units: &[Registration], direction: Direction) -> Vec<UnitPlan> {
        match direction {
            Direction::Up => units.iter().map(|u| self.plan(u, direction)).collect(),
            Direction::Down => units
                .iter()
                .rev()
                .map(|u| self.plan(u, direction))
                .collect(),
        }
    }
}
