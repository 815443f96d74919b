//! Project configuration (`jone/jonefile.json`).
//!
//! ```json
//! {
//!   "client": "postgresql",
//!   "connection": {
//!     "host": "localhost",
//!     "port": 5432,
//!     "user": "username",
//!     "password": "password",
//!     "database": "my_db",
//!     "ssl_mode": "disable"
//!   },
//!   "pool": { "max_open_conns": 10 },
//!   "migrations": { "table_name": "jone_migrations" }
//! }
//! ```
//!
//! Zero or missing pool values keep the driver defaults.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::any::{AnyConnectOptions, AnyPoolOptions};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{AnyPool, ConnectOptions};
use tracing::{debug, warn};

use jone_core::PostgresDialect;

use crate::error::{MigrateError, Result};

/// Default name of the migrations tracking table.
pub const DEFAULT_MIGRATIONS_TABLE: &str = "jone_migrations";

/// Database product the project targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Client {
    /// PostgreSQL.
    #[default]
    #[serde(alias = "postgres", alias = "pg")]
    Postgresql,
}

impl Client {
    /// Returns the SQL dialect for this client.
    #[must_use]
    pub const fn dialect(self) -> PostgresDialect {
        match self {
            Self::Postgresql => PostgresDialect::new(),
        }
    }
}

/// Database connection parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connection {
    /// Full connection URL; overrides the individual fields when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Server host.
    pub host: String,
    /// Server port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
    /// Database name.
    pub database: String,
    /// `disable`, `require`, `verify-full`, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_mode: Option<String>,
}

/// Connection pool settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pool {
    /// Maximum number of open connections. 0 keeps the driver default.
    pub max_open_conns: u32,
    /// Maximum number of idle connections. Not supported by the sqlx pool;
    /// a non-zero value is ignored with a warning.
    pub max_idle_conns: u32,
    /// Maximum lifetime of a connection in seconds. 0 means no limit.
    pub conn_max_lifetime_secs: u64,
    /// Maximum idle time of a connection in seconds. 0 means no limit.
    pub conn_max_idle_time_secs: u64,
}

/// Migration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Migrations {
    /// Name of the tracking table.
    pub table_name: String,
}

impl Default for Migrations {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_MIGRATIONS_TABLE.to_string(),
        }
    }
}

/// The main configuration for jone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target database product.
    pub client: Client,
    /// Connection parameters.
    pub connection: Connection,
    /// Pool settings.
    pub pool: Pool,
    /// Migration settings.
    pub migrations: Migrations,
}

impl Config {
    /// Configuration written by `jone init`.
    #[must_use]
    pub fn template() -> Self {
        Self {
            client: Client::Postgresql,
            connection: Connection {
                url: None,
                host: "localhost".to_string(),
                port: Some(5432),
                user: "username".to_string(),
                password: "password".to_string(),
                database: "my_db".to_string(),
                ssl_mode: Some("disable".to_string()),
            },
            pool: Pool::default(),
            migrations: Migrations::default(),
        }
    }

    /// Loads a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Serializes the configuration as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the configuration can be used.
    pub fn validate(&self) -> Result<()> {
        if self.migrations.table_name.trim().is_empty() {
            return Err(MigrateError::Config(
                "migrations.table_name must not be empty".to_string(),
            ));
        }
        if self.connection.url.is_none() && self.connection.database.is_empty() {
            return Err(MigrateError::Config(
                "connection.database (or connection.url) is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds connect options; `url` takes precedence over the configuration.
    pub fn connect_options(&self, url: Option<&str>) -> Result<AnyConnectOptions> {
        if let Some(url) = url.or(self.connection.url.as_deref()) {
            return Ok(AnyConnectOptions::from_str(url)?);
        }

        let connection = &self.connection;
        let mut options = match self.client {
            Client::Postgresql => PgConnectOptions::new(),
        };
        if !connection.host.is_empty() {
            options = options.host(&connection.host);
        }
        if let Some(port) = connection.port {
            options = options.port(port);
        }
        if !connection.user.is_empty() {
            options = options.username(&connection.user);
        }
        if !connection.password.is_empty() {
            options = options.password(&connection.password);
        }
        options = options.database(&connection.database);
        if let Some(ref ssl_mode) = connection.ssl_mode {
            let mode = PgSslMode::from_str(ssl_mode)
                .map_err(|e| MigrateError::Config(format!("connection.ssl_mode: {e}")))?;
            options = options.ssl_mode(mode);
        }

        Ok(AnyConnectOptions::from_url(&options.to_url_lossy())?)
    }

    /// Returns pool options derived from the `pool` section.
    #[must_use]
    pub fn pool_options(&self) -> AnyPoolOptions {
        let pool = &self.pool;
        let mut options = AnyPoolOptions::new();
        if pool.max_open_conns > 0 {
            options = options.max_connections(pool.max_open_conns);
        }
        if pool.max_idle_conns > 0 {
            warn!(
                max_idle_conns = pool.max_idle_conns,
                "pool.max_idle_conns is not supported and is ignored"
            );
        }
        options = options.max_lifetime(
            (pool.conn_max_lifetime_secs > 0)
                .then(|| Duration::from_secs(pool.conn_max_lifetime_secs)),
        );
        options.idle_timeout(
            (pool.conn_max_idle_time_secs > 0)
                .then(|| Duration::from_secs(pool.conn_max_idle_time_secs)),
        )
    }

    /// Connects a pool to the configured database.
    pub async fn connect(&self, url: Option<&str>) -> Result<AnyPool> {
        sqlx::any::install_default_drivers();
        let options = self.connect_options(url)?;
        Ok(self.pool_options().connect_with(options).await?)
    }
}
