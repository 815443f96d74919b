//! Project scaffolding: `jone init` and `jone migrate:make`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{MigrateError, Result};
use crate::project::Project;
use crate::registry::{atomic_write, regenerate};

/// Timestamp prefix of new migration folders.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// What `init` created.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InitReport {
    /// Files and folders written, in order.
    pub created: Vec<PathBuf>,
}

/// Creates the `jone` folder, the configuration file, the migrations
/// folder, the registry and (optionally) the runner binary source.
///
/// Existing files are left untouched, so `init` can be re-run safely.
pub fn init(project: &Project, with_runner: bool) -> Result<InitReport> {
    let mut report = InitReport::default();

    for dir in [project.jone_dir(), project.migrations_dir()] {
        if !dir.is_dir() {
            std::fs::create_dir_all(&dir)?;
            report.created.push(dir);
        }
    }

    let jonefile = project.jonefile();
    if jonefile.exists() {
        debug!(path = %jonefile.display(), "Configuration already exists");
    } else {
        std::fs::write(&jonefile, Config::template().to_json()? + "\n")?;
        report.created.push(jonefile);
    }

    let registry_existed = project.registry_file().exists();
    regenerate(project)?;
    if !registry_existed {
        report.created.push(project.registry_file());
    }

    if with_runner {
        let runner = project.runner_file();
        if runner.exists() {
            debug!(path = %runner.display(), "Runner already exists");
        } else {
            std::fs::write(&runner, RUNNER_TEMPLATE)?;
            report.created.push(runner);
        }
    }

    info!(created = report.created.len(), "jone init complete");
    Ok(report)
}

/// Cargo target declaring the runner binary.
#[must_use]
pub fn runner_bin_snippet() -> String {
    format!("[[bin]]\nname = \"migrate\"\npath = \"{}\"\n", crate::project::RUNNER_PATH)
}

const RUNNER_TEMPLATE: &str = r#"//! Migration runner. Run with `cargo run --bin migrate -- migrate:latest`.

use std::process::ExitCode;

#[path = "migrations/registry/mod.rs"]
mod registry;

fn main() -> ExitCode {
    jone_migrate::cli::main(registry::registry)
}
"#;

/// Returns `true` if `name` can be used as a migration slug.
#[must_use]
pub fn is_valid_slug(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('_')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Creates a migration unit stamped with the current time.
pub fn make(project: &Project, name: &str) -> Result<PathBuf> {
    make_at(project, name, Utc::now())
}

/// Creates `<timestamp>_<name>/mod.rs` and regenerates the registry.
pub fn make_at(project: &Project, name: &str, now: DateTime<Utc>) -> Result<PathBuf> {
    if !is_valid_slug(name) {
        return Err(MigrateError::InvalidMigrationName(name.to_string()));
    }
    for required in [project.jone_dir(), project.jonefile()] {
        if !required.exists() {
            return Err(MigrateError::NotInitialized(required));
        }
    }

    let migrations_dir = project.migrations_dir();
    std::fs::create_dir_all(&migrations_dir)?;

    let folder = format!("{}_{name}", now.format(TIMESTAMP_FORMAT));
    let unit_dir = migrations_dir.join(&folder);
    if unit_dir.exists() {
        return Err(MigrateError::MigrationExists(unit_dir));
    }
    std::fs::create_dir(&unit_dir)?;

    let unit_file = unit_dir.join("mod.rs");
    atomic_write(&unit_file, &render_unit(&folder))?;
    info!(path = %unit_file.display(), "Created migration");

    regenerate(project)?;
    Ok(unit_file)
}

fn render_unit(folder: &str) -> String {
    format!(
        "//! Migration {folder}.\n\
         \n\
         use jone_core::Schema;\n\
         \n\
         pub fn up(schema: &mut Schema) {{\n\
         \x20   // schema.create_table(\"users\", |t| {{\n\
         \x20   //     t.increments(\"id\");\n\
         \x20   //     t.timestamps();\n\
         \x20   // }});\n\
         \x20   let _ = schema;\n\
         }}\n\
         \n\
         pub fn down(schema: &mut Schema) {{\n\
         \x20   // schema.drop_table(\"users\");\n\
         \x20   let _ = schema;\n\
         }}\n"
    )
}
