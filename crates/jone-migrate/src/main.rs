//! jone CLI
//!
//! Scaffolds a project and keeps its migration registry in sync. Running
//! migrations is done by the project's own runner binary (see
//! `jone_migrate::cli`).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use jone_migrate::cli::init_tracing;
use jone_migrate::project::Project;
use jone_migrate::{registry, scaffold};

/// Schema migrations compiled to dialect SQL.
#[derive(Parser)]
#[command(name = "jone")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project root (the folder holding Cargo.toml).
    #[arg(short, long, global = true, default_value = ".")]
    project_root: PathBuf,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a jone project.
    Init {
        /// Do not write the runner binary source (jone/migrate.rs).
        #[arg(long)]
        no_runner: bool,
    },

    /// Create a new timestamped migration.
    #[command(name = "migrate:make")]
    Make {
        /// Migration name (lowercase letters, digits and '_').
        name: String,
    },

    /// Regenerate jone/migrations/registry/mod.rs.
    Registry,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let project = Project::new(cli.project_root);

    match cli.command {
        Commands::Init { no_runner } => {
            let report = scaffold::init(&project, !no_runner)?;
            for path in &report.created {
                info!("Created {}", path.display());
            }
            if report.created.contains(&project.runner_file()) {
                info!("Add the runner to Cargo.toml:");
                println!("\n{}", scaffold::runner_bin_snippet());
            }
        }

        Commands::Make { name } => {
            let path = scaffold::make(&project, &name)?;
            info!("Created migration: {}", path.display());
        }

        Commands::Registry => {
            let migrations = registry::regenerate(&project)?;
            for migration in &migrations {
                info!(alias = %migration.alias, "{}", migration.name);
            }
        }
    }

    Ok(())
}
