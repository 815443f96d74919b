//! Tracked migration commands.
//!
//! [`Migrator`] ties a [`Registry`] to the tracking table: it reads the
//! applied set, selects the units a command needs and runs them through the
//! [`Runner`].

use std::collections::HashMap;
use std::io::Write;

use chrono::{DateTime, Utc};
use sqlx::AnyPool;
use tracing::{info, warn};

use jone_core::{Dialect, Direction, MigrationState, Registration, Registry, UnitPlan};

use crate::error::Result;
use crate::executor::SqlxExecutor;
use crate::history::MigrationHistory;
use crate::runner::{write_plan, DryRunExecutor, RunReport, Runner, StatementExecutor};

/// Status line of one registered unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Unit name.
    pub name: &'static str,
    /// Unit alias.
    pub alias: String,
    /// When the unit was applied, if it was.
    pub applied_at: Option<DateTime<Utc>>,
}

/// Full status report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    /// Registered units, in run order.
    pub entries: Vec<StatusEntry>,
    /// Applied names with no registered unit.
    pub unknown: Vec<String>,
}

/// Runs registry units against a database, tracking what is applied.
pub struct Migrator<D: Dialect> {
    registry: Registry,
    runner: Runner<D>,
    pool: AnyPool,
    history: MigrationHistory,
    dry_run: bool,
}

impl<D: Dialect> Migrator<D> {
    /// Creates a migrator using `table_name` as the tracking table.
    pub fn new(registry: Registry, dialect: D, pool: AnyPool, table_name: &str) -> Self {
        let history = MigrationHistory::new(pool.clone(), table_name, &dialect);
        Self {
            registry,
            runner: Runner::new(dialect),
            pool,
            history,
            dry_run: false,
        }
    }

    /// Enables dry-run mode (SQL is printed but not executed).
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Returns the registry.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the migration history.
    #[must_use]
    pub const fn history(&self) -> &MigrationHistory {
        &self.history
    }

    /// Ensures the tracking table exists. Does nothing in dry-run mode.
    pub async fn init(&self) -> Result<()> {
        if !self.dry_run {
            self.history.ensure_table().await?;
        }
        Ok(())
    }

    /// Loads the applied set.
    ///
    /// In dry-run mode a missing tracking table reads as nothing applied.
    pub async fn state(&self) -> Result<MigrationState> {
        match self.history.state().await {
            Ok(state) => Ok(state),
            Err(e) if self.dry_run => {
                warn!(error = %e, "Cannot read migration history, assuming nothing is applied");
                Ok(MigrationState::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Runs all pending units.
    pub async fn latest(&self) -> Result<RunReport> {
        self.init().await?;
        let pending = self.state().await?.pending(&self.registry);
        info!(count = pending.len(), "Pending migrations");
        self.execute(&pending, Direction::Up).await
    }

    /// Runs the next pending unit, or the named one.
    pub async fn up(&self, name: Option<&str>) -> Result<RunReport> {
        self.init().await?;
        let state = self.state().await?;
        let units: Vec<Registration> = state
            .next_pending(&self.registry, name)?
            .into_iter()
            .collect();
        self.execute(&units, Direction::Up).await
    }

    /// Reverts the last applied unit, or the named one.
    pub async fn down(&self, name: Option<&str>) -> Result<RunReport> {
        self.init().await?;
        let state = self.state().await?;
        let units: Vec<Registration> = state
            .last_applied(&self.registry, name)?
            .into_iter()
            .collect();
        self.execute(&units, Direction::Down).await
    }

    /// Reverts every applied unit, newest first.
    pub async fn reset(&self) -> Result<RunReport> {
        self.init().await?;
        let applied = self.state().await?.applied(&self.registry);
        self.execute(&applied, Direction::Down).await
    }

    /// Reports which units are applied.
    pub async fn status(&self) -> Result<StatusReport> {
        self.history.ensure_table().await?;
        let applied_at: HashMap<String, DateTime<Utc>> = self
            .history
            .applied()
            .await?
            .into_iter()
            .map(|m| (m.name, m.applied_at))
            .collect();
        let state = MigrationState::from_applied(applied_at.keys().cloned());

        let entries = state
            .status(&self.registry)
            .into_iter()
            .map(|status| StatusEntry {
                name: status.name,
                alias: status.alias,
                applied_at: applied_at.get(status.name).copied(),
            })
            .collect();
        let unknown = state
            .unknown_applied(&self.registry)
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(StatusReport { entries, unknown })
    }

    /// Compiles every registered unit without touching the database.
    #[must_use]
    pub fn plans(&self, direction: Direction) -> Vec<UnitPlan> {
        self.runner
            .planner()
            .plan_all(self.registry.units(), direction)
    }

    /// Writes the SQL of every registered unit.
    pub fn write_sql<W: Write>(&self, out: &mut W, direction: Direction) -> Result<()> {
        for plan in self.plans(direction) {
            write_plan(out, &plan)?;
        }
        Ok(())
    }

    async fn execute(&self, units: &[Registration], direction: Direction) -> Result<RunReport> {
        let mut executor: Box<dyn StatementExecutor> = if self.dry_run {
            Box::new(DryRunExecutor::new())
        } else {
            Box::new(SqlxExecutor::new(self.pool.clone()).with_history(self.history.clone()))
        };
        match direction {
            Direction::Up => self.runner.run_up(units, executor.as_mut()).await,
            Direction::Down => self.runner.run_down(units, executor.as_mut()).await,
        }
    }
}
