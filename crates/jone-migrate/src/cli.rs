//! Migration runner CLI.
//!
//! A project's runner binary (written by `jone init`) hands its generated
//! registry to [`main`]:
//!
//! ```rust,ignore
//! #[path = "migrations/registry/mod.rs"]
//! mod registry;
//!
//! fn main() -> std::process::ExitCode {
//!     jone_migrate::cli::main(registry::registry)
//! }
//! ```
//!
//! ```bash
//! cargo run --bin migrate -- migrate:latest
//! cargo run --bin migrate -- migrate:down --dry-run
//! cargo run --bin migrate -- migrate:status
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use jone_core::{Direction, MigrationError, MigrationPlanner, PostgresDialect, Registry};

use crate::config::Config;
use crate::error::MigrateError;
use crate::migrator::{Migrator, StatusReport};
use crate::project::JONEFILE_PATH;
use crate::runner::{write_plan, RunReport};

/// Runs jone migrations.
#[derive(Debug, Parser)]
#[command(name = "migrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file.
    #[arg(short, long, global = true, default_value = JONEFILE_PATH)]
    pub config: PathBuf,

    /// Database URL; overrides the configured connection.
    #[arg(short, long, global = true, env = "DATABASE_URL")]
    pub database: Option<String>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Runner commands.
#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Run all pending migrations.
    #[command(name = "migrate:latest")]
    Latest {
        /// Print SQL without executing it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Run the next pending migration, or the named one.
    #[command(name = "migrate:up")]
    Up {
        /// Migration name.
        name: Option<String>,

        /// Print SQL without executing it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Roll back the last applied migration, or the named one.
    #[command(name = "migrate:down")]
    Down {
        /// Migration name.
        name: Option<String>,

        /// Print SQL without executing it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Roll back every applied migration.
    #[command(name = "migrate:reset")]
    Reset {
        /// Print SQL without executing it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show which migrations are applied.
    #[command(name = "migrate:status")]
    Status,

    /// Print the SQL of every migration without connecting.
    #[command(name = "migrate:sql")]
    Sql {
        /// Print rollback SQL instead of forward SQL.
        #[arg(long)]
        down: bool,
    },
}

/// Installs the fmt subscriber; `verbose` switches INFO to DEBUG.
pub fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Parses the process arguments and runs the command against `registry`.
pub async fn run(registry: Registry) -> anyhow::Result<()> {
    run_with(Cli::parse(), registry).await
}

/// Runs a parsed command against `registry`.
pub async fn run_with(cli: Cli, registry: Registry) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let database = cli.database.as_deref();

    match cli.command {
        Command::Latest { dry_run } => {
            let migrator = open(&config, database, registry, dry_run).await?;
            summarize(&migrator.latest().await?);
        }
        Command::Up { name, dry_run } => {
            let migrator = open(&config, database, registry, dry_run).await?;
            summarize(&migrator.up(name.as_deref()).await?);
        }
        Command::Down { name, dry_run } => {
            let migrator = open(&config, database, registry, dry_run).await?;
            summarize(&migrator.down(name.as_deref()).await?);
        }
        Command::Reset { dry_run } => {
            let migrator = open(&config, database, registry, dry_run).await?;
            summarize(&migrator.reset().await?);
        }
        Command::Status => {
            let migrator = open(&config, database, registry, false).await?;
            let report = migrator.status().await?;
            print_status(&mut io::stdout().lock(), &report)?;
        }
        Command::Sql { down } => {
            let direction = if down { Direction::Down } else { Direction::Up };
            let planner = MigrationPlanner::new(config.client.dialect());
            let mut out = io::stdout().lock();
            for plan in planner.plan_all(registry.units(), direction) {
                write_plan(&mut out, &plan)?;
            }
        }
    }

    Ok(())
}

async fn open(
    config: &Config,
    database: Option<&str>,
    registry: Registry,
    dry_run: bool,
) -> anyhow::Result<Migrator<PostgresDialect>> {
    if dry_run {
        info!("Dry run mode - SQL will be printed but not executed.");
    }
    let pool = config.connect(database).await?;
    Ok(Migrator::new(
        registry,
        config.client.dialect(),
        pool,
        &config.migrations.table_name,
    )
    .dry_run(dry_run))
}

/// Entry point for runner binaries.
///
/// Parses arguments, installs logging, builds the registry and runs the
/// command on a fresh tokio runtime.
pub fn main(registry: fn() -> Result<Registry, MigrationError>) -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Failed to install logging: {e}");
    }

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(anyhow::Error::from)
        .and_then(|runtime| {
            let registry = registry()?;
            runtime.block_on(run_with(cli, registry))
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// The line logged for a failed command. Error messages already embed their
/// cause, so the chain is not walked.
fn failure_message(e: &anyhow::Error) -> String {
    e.to_string()
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    if cli.config.exists() {
        return Ok(Config::load(&cli.config)?);
    }
    if cli.database.is_some() || matches!(cli.command, Command::Sql { .. }) {
        info!(path = %cli.config.display(), "No configuration file, using defaults");
        return Ok(Config::default());
    }
    Err(MigrateError::NotInitialized(cli.config.clone()).into())
}

fn summarize(report: &RunReport) {
    info!(
        direction = %report.direction,
        count = report.completed.len(),
        "Run finished"
    );
}

/// Prints a status report, one line per unit.
pub fn print_status<W: Write>(out: &mut W, report: &StatusReport) -> io::Result<()> {
    if report.entries.is_empty() {
        writeln!(out, "No migrations registered.")?;
    }
    for entry in &report.entries {
        match entry.applied_at {
            Some(at) => writeln!(
                out,
                " [X] {} ({})",
                entry.name,
                at.format("%Y-%m-%d %H:%M:%S")
            )?,
            None => writeln!(out, " [ ] {}", entry.name)?,
        }
    }
    for name in &report.unknown {
        writeln!(out, " [?] {name} (not in registry)")?;
    }
    Ok(())
}
