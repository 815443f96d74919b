//! Migration history tracking.
//!
//! This module manages the tracking table (`jone_migrations` by default) that
//! records which units have been applied to the database.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{AnyConnection, AnyPool};

use jone_core::{Dialect, MigrationState};

use crate::error::Result;

/// A record of an applied unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    /// Unit name.
    pub name: String,
    /// Unit alias.
    pub alias: String,
    /// When the unit was applied.
    pub applied_at: DateTime<Utc>,
}

/// Manages the migration history in the database.
#[derive(Debug, Clone)]
pub struct MigrationHistory {
    pool: AnyPool,
    table: String,
}

impl MigrationHistory {
    /// Creates a history manager for `table_name`, quoted with `dialect`.
    pub fn new<D: Dialect + ?Sized>(pool: AnyPool, table_name: &str, dialect: &D) -> Self {
        Self {
            pool,
            table: dialect.quote_identifier(table_name),
        }
    }

    /// Returns the quoted table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Ensures the tracking table exists.
    pub async fn ensure_table(&self) -> Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n  \
             name VARCHAR(255) PRIMARY KEY,\n  \
             alias VARCHAR(255) NOT NULL,\n  \
             applied_at VARCHAR(64) NOT NULL\n)",
            self.table
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    /// Records a unit as applied, on the caller's connection.
    pub async fn record_applied(
        &self,
        conn: &mut AnyConnection,
        name: &str,
        alias: &str,
    ) -> Result<()> {
        let applied_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let sql = format!(
            "INSERT INTO {} (name, alias, applied_at) VALUES ($1, $2, $3)",
            self.table
        );
        sqlx::query(&sql)
            .bind(name)
            .bind(alias)
            .bind(applied_at)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Removes a unit's record (for rollback), on the caller's connection.
    pub async fn record_unapplied(&self, conn: &mut AnyConnection, name: &str) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE name = $1", self.table);
        sqlx::query(&sql).bind(name).execute(&mut *conn).await?;
        Ok(())
    }

    /// Gets all applied units, oldest first.
    pub async fn applied(&self) -> Result<Vec<AppliedMigration>> {
        let sql = format!(
            "SELECT name, alias, applied_at FROM {} ORDER BY applied_at, name",
            self.table
        );
        let rows: Vec<(String, String, String)> =
            sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|(name, alias, applied_at)| AppliedMigration {
                name,
                alias,
                applied_at: parse_applied_at(&applied_at),
            })
            .collect())
    }

    /// Checks if a unit has been applied.
    pub async fn is_applied(&self, name: &str) -> Result<bool> {
        let sql = format!("SELECT name FROM {} WHERE name = $1", self.table);
        let row: Option<(String,)> = sqlx::query_as(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Loads the applied set.
    pub async fn state(&self) -> Result<MigrationState> {
        let sql = format!("SELECT name FROM {}", self.table);
        let rows: Vec<(String,)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(MigrationState::from_applied(
            rows.into_iter().map(|(name,)| name),
        ))
    }
}

fn parse_applied_at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| {
            // Rows written by hand with the SQL datetime format.
            chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .map(|dt| dt.and_utc())
                .unwrap_or(DateTime::UNIX_EPOCH)
        })
}
