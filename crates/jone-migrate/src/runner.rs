//! Ordered execution of migration units.
//!
//! The [`Runner`] compiles each unit against a fresh schema and hands the
//! statements to a [`StatementExecutor`]. Units run strictly one after
//! another; the first failure stops the run and leaves earlier units applied.

use std::io::{self, Write};

use async_trait::async_trait;
use tracing::{error, info};

use jone_core::{Dialect, Direction, MigrationPlanner, Registration, UnitPlan};

use crate::error::Result;

/// Runs the compiled statements of one unit.
#[async_trait]
pub trait StatementExecutor: Send {
    /// Executes every statement of `plan`, in order.
    async fn execute(&mut self, plan: &UnitPlan) -> Result<()>;
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Direction of the run.
    pub direction: Direction,
    /// Units completed, in execution order.
    pub completed: Vec<&'static str>,
}

/// Runs migration units forward or backward.
#[derive(Debug, Clone, Default)]
pub struct Runner<D: Dialect> {
    planner: MigrationPlanner<D>,
}

impl<D: Dialect> Runner<D> {
    /// Creates a runner compiling with `dialect`.
    #[must_use]
    pub const fn new(dialect: D) -> Self {
        Self {
            planner: MigrationPlanner::new(dialect),
        }
    }

    /// Returns the planner.
    #[must_use]
    pub const fn planner(&self) -> &MigrationPlanner<D> {
        &self.planner
    }

    /// Applies `units` in the given order.
    pub async fn run_up<E>(&self, units: &[Registration], executor: &mut E) -> Result<RunReport>
    where
        E: StatementExecutor + ?Sized,
    {
        self.run(units, Direction::Up, executor).await
    }

    /// Reverts `units` in reverse order.
    pub async fn run_down<E>(&self, units: &[Registration], executor: &mut E) -> Result<RunReport>
    where
        E: StatementExecutor + ?Sized,
    {
        self.run(units, Direction::Down, executor).await
    }

    async fn run<E>(
        &self,
        units: &[Registration],
        direction: Direction,
        executor: &mut E,
    ) -> Result<RunReport>
    where
        E: StatementExecutor + ?Sized,
    {
        let mut report = RunReport {
            direction,
            completed: Vec::with_capacity(units.len()),
        };
        if units.is_empty() {
            info!("No migrations to run");
            return Ok(report);
        }

        let ordered: Vec<&Registration> = match direction {
            Direction::Up => units.iter().collect(),
            Direction::Down => units.iter().rev().collect(),
        };

        for unit in ordered {
            match direction {
                Direction::Up => info!("Running migration: {} (up)", unit.name()),
                Direction::Down => info!("Rolling back migration: {} (down)", unit.name()),
            }

            let plan = self.planner.plan(unit, direction);
            if let Err(e) = executor.execute(&plan).await {
                error!(name = %unit.name(), direction = %direction, "Migration failed");
                return Err(e);
            }

            match direction {
                Direction::Up => info!("Completed migration: {}", unit.name()),
                Direction::Down => info!("Completed rollback: {}", unit.name()),
            }
            report.completed.push(unit.name());
        }

        match direction {
            Direction::Up => info!("All migrations completed successfully"),
            Direction::Down => info!("All rollbacks completed successfully"),
        }
        Ok(report)
    }
}

/// Prints the statements instead of executing them.
#[derive(Debug)]
pub struct DryRunExecutor<W = io::Stdout> {
    out: W,
}

impl DryRunExecutor {
    /// Creates a dry-run executor printing to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for DryRunExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> DryRunExecutor<W> {
    /// Creates a dry-run executor printing to `out`.
    pub const fn with_writer(out: W) -> Self {
        Self { out }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[async_trait]
impl<W: Write + Send> StatementExecutor for DryRunExecutor<W> {
    async fn execute(&mut self, plan: &UnitPlan) -> Result<()> {
        write_plan(&mut self.out, plan)?;
        Ok(())
    }
}

/// Writes a unit's statements with a header comment.
pub fn write_plan<W: Write + ?Sized>(out: &mut W, plan: &UnitPlan) -> io::Result<()> {
    writeln!(out, "-- {} ({})", plan.name, plan.direction)?;
    if plan.statements.is_empty() {
        writeln!(out, "-- (no statements)")?;
    }
    for sql in &plan.statements {
        writeln!(out, "{sql}")?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MigrateError;
    use jone_core::{MigrationError, PostgresDialect, Schema};

    /// Records plans and fails on a chosen unit.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<(&'static str, Direction, usize)>,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl StatementExecutor for Recorder {
        async fn execute(&mut self, plan: &UnitPlan) -> Result<()> {
            if self.fail_on == Some(plan.name) {
                return Err(MigrateError::Migration(MigrationError::NotApplied(
                    plan.name.to_string(),
                )));
            }
            self.seen
                .push((plan.name, plan.direction, plan.statements.len()));
            Ok(())
        }
    }

    fn create_a(schema: &mut Schema) {
        schema.create_table("a", |t| {
            t.increments("id");
        });
    }

    fn drop_a(schema: &mut Schema) {
        schema.drop_table("a");
    }

    fn two_statements(schema: &mut Schema) {
        schema.raw("SELECT 1;").raw("SELECT 2;");
    }

    fn noop(_: &mut Schema) {}

    fn units() -> Vec<Registration> {
        vec![
            Registration::new("1_a", create_a, drop_a),
            Registration::new("2_b", two_statements, noop),
            Registration::new("10_c", noop, two_statements),
        ]
    }

    #[tokio::test]
    async fn test_run_up_in_order() {
        let runner = Runner::new(PostgresDialect::new());
        let mut recorder = Recorder::default();

        let report = runner.run_up(&units(), &mut recorder).await.unwrap();

        assert_eq!(report.direction, Direction::Up);
        assert_eq!(report.completed, ["1_a", "2_b", "10_c"]);
        assert_eq!(
            recorder.seen,
            [
                ("1_a", Direction::Up, 1),
                ("2_b", Direction::Up, 2),
                ("10_c", Direction::Up, 0),
            ]
        );
    }

    #[tokio::test]
    async fn test_run_down_in_reverse() {
        let runner = Runner::new(PostgresDialect::new());
        let mut recorder = Recorder::default();

        let report = runner.run_down(&units(), &mut recorder).await.unwrap();

        assert_eq!(report.completed, ["10_c", "2_b", "1_a"]);
        assert_eq!(recorder.seen[0], ("10_c", Direction::Down, 2));
    }

    #[tokio::test]
    async fn test_fail_fast() {
        let runner = Runner::new(PostgresDialect::new());
        let mut recorder = Recorder {
            fail_on: Some("2_b"),
            ..Recorder::default()
        };

        let result = runner.run_up(&units(), &mut recorder).await;

        assert!(result.is_err());
        let names: Vec<_> = recorder.seen.iter().map(|(name, _, _)| *name).collect();
        assert_eq!(names, ["1_a"]);
    }

    #[tokio::test]
    async fn test_empty_run() {
        let runner = Runner::new(PostgresDialect::new());
        let mut recorder = Recorder::default();
        let report = runner.run_up(&[], &mut recorder).await.unwrap();
        assert!(report.completed.is_empty());
        assert!(recorder.seen.is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_output() {
        let runner = Runner::new(PostgresDialect::new());
        let mut dry_run = DryRunExecutor::with_writer(Vec::new());

        runner
            .run_up(&units()[..2], &mut dry_run)
            .await
            .unwrap();

        let output = String::from_utf8(dry_run.into_inner()).unwrap();
        assert_eq!(
            output,
            "-- 1_a (up)\n\
             CREATE TABLE \"a\" (\n  \"id\" SERIAL PRIMARY KEY\n);\n\
             \n\
             -- 2_b (up)\n\
             SELECT 1;\n\
             SELECT 2;\n\
             \n"
        );
    }

    #[tokio::test]
    async fn test_dyn_executor() {
        let runner = Runner::new(PostgresDialect::new());
        let mut recorder = Recorder::default();
        let executor: &mut dyn StatementExecutor = &mut recorder;
        runner.run_up(&units(), executor).await.unwrap();
        assert_eq!(recorder.seen.len(), 3);
    }
}
