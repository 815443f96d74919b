//! Registry source generation.
//!
//! Scans the migrations folder for unit folders (`<digits>_<slug>`) and
//! writes `registry/mod.rs`, a module exposing
//! `pub fn registry() -> Result<Registry, MigrationError>`. The file is
//! replaced wholesale on every run.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use jone_core::{alias_for, compare_unit_names, is_unit_name, MigrationError};

use crate::error::{MigrateError, Result};
use crate::project::{Project, REGISTRY_DIR};

/// A discovered migration unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationInfo {
    /// Folder name, also the unit name.
    pub name: String,
    /// Module alias (`m<digits>`).
    pub alias: String,
    /// Module path relative to the generated file.
    pub reference: String,
}

impl MigrationInfo {
    /// Describes the unit in folder `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            alias: alias_for(&name),
            reference: format!("../{name}/mod.rs"),
            name,
        }
    }
}

/// Lists the unit folders of `migrations_dir`, ordered like the registry.
///
/// Files, the `registry` folder and folders without a numeric prefix are
/// skipped.
pub fn discover(migrations_dir: &Path) -> Result<Vec<MigrationInfo>> {
    let unreadable = |source| MigrateError::MigrationsDirUnreadable {
        path: migrations_dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(migrations_dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        if !entry.file_type().map_err(unreadable)?.is_dir() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            debug!(path = %entry.path().display(), "Skipping non UTF-8 folder");
            continue;
        };
        if name == REGISTRY_DIR {
            continue;
        }
        if !is_unit_name(&name) {
            debug!(folder = %name, "Skipping folder without a numeric prefix");
            continue;
        }
        names.push(name);
    }

    names.sort_by(|a, b| compare_unit_names(a, b));
    let migrations: Vec<MigrationInfo> = names.into_iter().map(MigrationInfo::new).collect();
    check_aliases(&migrations)?;
    Ok(migrations)
}

fn check_aliases(migrations: &[MigrationInfo]) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for migration in migrations {
        if let Some(first) = seen.insert(&migration.alias, &migration.name) {
            return Err(MigrationError::DuplicateAlias {
                alias: migration.alias.clone(),
                first: first.to_string(),
                second: migration.name.clone(),
            }
            .into());
        }
    }
    Ok(())
}

/// Renders the registry module source.
#[must_use]
pub fn render(crate_name: &str, migrations: &[MigrationInfo]) -> String {
    let mut modules = String::new();
    let mut registrations = String::new();
    for m in migrations {
        modules.push_str(&format!(
            "#[path = {reference:?}]\nmod {alias};\n",
            reference = m.reference,
            alias = m.alias
        ));
        registrations.push_str(&format!(
            "        Registration::new({name:?}, {alias}::up, {alias}::down),\n",
            name = m.name,
            alias = m.alias
        ));
    }
    if !modules.is_empty() {
        modules.push('\n');
    }

    format!(
        "// Code generated by jone. DO NOT EDIT.\n\
         //! Migration registry of the `{crate_name}` crate.\n\
         //!\n\
         //! Regenerate with `jone registry` (done automatically by `jone migrate:make`).\n\
         \n\
         use jone_core::{{MigrationError, Registration, Registry}};\n\
         \n\
         {modules}\
         /// Returns every migration unit, in run order.\n\
         pub fn registry() -> Result<Registry, MigrationError> {{\n\
         \x20   Registry::new(vec![\n\
         {registrations}\
         \x20   ])\n\
         }}\n"
    )
}

/// Writes `content` to `path` through a temporary file in the same folder.
pub fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    let tmp_path = path.with_extension("rs.tmp");
    std::fs::write(&tmp_path, content)?;

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(())
}

/// Regenerates `registry/mod.rs` for the project.
pub fn regenerate(project: &Project) -> Result<Vec<MigrationInfo>> {
    let migrations_dir = project.migrations_dir();
    let migrations = discover(&migrations_dir)?;
    let crate_name = project.crate_name()?;

    let registry_file = project.registry_file();
    if let Some(dir) = registry_file.parent() {
        std::fs::create_dir_all(dir)?;
    }
    atomic_write(&registry_file, &render(&crate_name, &migrations))?;

    info!(
        path = %registry_file.display(),
        count = migrations.len(),
        "Registry regenerated"
    );
    Ok(migrations)
}
