//! On-disk layout of a jone project.
//!
//! ```text
//! <root>/
//!   Cargo.toml
//!   jone/
//!     jonefile.json
//!     migrate.rs              runner binary
//!     migrations/
//!       <digits>_<slug>/mod.rs
//!       registry/mod.rs       generated
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{MigrateError, Result};

/// Folder holding everything jone owns.
pub const JONE_DIR: &str = "jone";
/// Configuration file, relative to the project root.
pub const JONEFILE_PATH: &str = "jone/jonefile.json";
/// Migrations folder, relative to the project root.
pub const MIGRATIONS_PATH: &str = "jone/migrations";
/// Runner binary source, relative to the project root.
pub const RUNNER_PATH: &str = "jone/migrate.rs";
/// Name of the generated registry folder inside the migrations folder.
pub const REGISTRY_DIR: &str = "registry";

/// Paths of a project rooted at a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
}

#[derive(Deserialize)]
struct Manifest {
    package: Option<Package>,
}

#[derive(Deserialize)]
struct Package {
    name: Option<String>,
}

impl Project {
    /// Creates a project rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `jone` folder.
    #[must_use]
    pub fn jone_dir(&self) -> PathBuf {
        self.root.join(JONE_DIR)
    }

    /// Returns the configuration file path.
    #[must_use]
    pub fn jonefile(&self) -> PathBuf {
        self.root.join(JONEFILE_PATH)
    }

    /// Returns the migrations folder.
    #[must_use]
    pub fn migrations_dir(&self) -> PathBuf {
        self.root.join(MIGRATIONS_PATH)
    }

    /// Returns the generated registry file.
    #[must_use]
    pub fn registry_file(&self) -> PathBuf {
        self.migrations_dir().join(REGISTRY_DIR).join("mod.rs")
    }

    /// Returns the runner binary source.
    #[must_use]
    pub fn runner_file(&self) -> PathBuf {
        self.root.join(RUNNER_PATH)
    }

    /// Returns the Cargo manifest path.
    #[must_use]
    pub fn manifest(&self) -> PathBuf {
        self.root.join("Cargo.toml")
    }

    /// Reads the name of the Cargo package owning the project.
    ///
    /// Fails with [`MigrateError::ModuleRootNotFound`] when the manifest is
    /// missing, unparseable, or has no `[package]` name.
    pub fn crate_name(&self) -> Result<String> {
        let manifest_path = self.manifest();
        let not_found = || MigrateError::ModuleRootNotFound(manifest_path.clone());

        let content = std::fs::read_to_string(&manifest_path).map_err(|_| not_found())?;
        let manifest: Manifest = toml::from_str(&content).map_err(|_| not_found())?;
        manifest
            .package
            .and_then(|p| p.name)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(not_found)
    }
}
