//! Migration executor.
//!
//! This module applies compiled units against a database, one transaction
//! per unit. Statements are sent unprepared, so a raw statement may hold
//! several commands.

use async_trait::async_trait;
use sqlx::{AnyConnection, AnyPool};
use tracing::debug;

use jone_core::{Direction, UnitPlan};

use crate::error::{MigrateError, Result};
use crate::history::MigrationHistory;
use crate::runner::StatementExecutor;

/// Executes units against an `AnyPool`.
///
/// Each unit runs in its own transaction. When a history is attached, the
/// unit's tracking row is written (or removed) inside that transaction, so
/// a unit and its record commit together.
#[derive(Debug, Clone)]
pub struct SqlxExecutor {
    pool: AnyPool,
    history: Option<MigrationHistory>,
}

impl SqlxExecutor {
    /// Creates an executor that does not record history.
    #[must_use]
    pub const fn new(pool: AnyPool) -> Self {
        Self {
            pool,
            history: None,
        }
    }

    /// Records applied/reverted units in `history`.
    #[must_use]
    pub fn with_history(mut self, history: MigrationHistory) -> Self {
        self.history = Some(history);
        self
    }

    /// Returns the pool.
    #[must_use]
    pub const fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

#[async_trait]
impl StatementExecutor for SqlxExecutor {
    async fn execute(&mut self, plan: &UnitPlan) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let conn: &mut AnyConnection = &mut tx;

        for (index, sql) in plan.statements.iter().enumerate() {
            debug!(sql = %sql, "Executing SQL");
            sqlx::Executor::execute(&mut *conn, sqlx::raw_sql(sql))
                .await
                .map_err(|source| MigrateError::Statement {
                    unit: plan.name.to_string(),
                    index,
                    sql: sql.clone(),
                    source,
                })?;
        }

        if let Some(ref history) = self.history {
            match plan.direction {
                Direction::Up => {
                    history
                        .record_applied(conn, plan.name, &plan.alias)
                        .await?;
                }
                Direction::Down => history.record_unapplied(conn, plan.name).await?,
            }
        }

        tx.commit().await?;
        Ok(())
    }
}
