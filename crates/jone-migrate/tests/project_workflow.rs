//! Scaffolding a project and keeping its registry in sync.

use chrono::{TimeZone, Utc};
use jone_migrate::prelude::*;
use jone_migrate::{registry, scaffold};

fn cargo_project() -> (tempfile::TempDir, Project) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("Cargo.toml"),
        "[package]\nname = \"blog\"\nversion = \"0.1.0\"\nedition = \"2021\"\n",
    )
    .unwrap();
    let project = Project::new(dir.path());
    (dir, project)
}

#[test]
fn test_init_make_and_regenerate() {
    let (_dir, project) = cargo_project();
    scaffold::init(&project, true).unwrap();

    let empty = std::fs::read_to_string(project.registry_file()).unwrap();
    assert!(empty.contains("Registry::new(vec![\n    ])"));

    let second = Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();
    let first = Utc.with_ymd_and_hms(2026, 1, 14, 3, 57, 49).unwrap();
    scaffold::make_at(&project, "create_posts", second).unwrap();
    scaffold::make_at(&project, "create_users", first).unwrap();

    // Stray entries in the migrations folder are ignored.
    std::fs::create_dir_all(project.migrations_dir().join("drafts")).unwrap();
    std::fs::write(project.migrations_dir().join("README.md"), "notes").unwrap();

    let migrations = registry::regenerate(&project).unwrap();
    let names: Vec<_> = migrations.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        ["20260114035749_create_users", "20260201090000_create_posts"]
    );

    let source = std::fs::read_to_string(project.registry_file()).unwrap();
    let users = source.find("m20260114035749::up").unwrap();
    let posts = source.find("m20260201090000::up").unwrap();
    assert!(users < posts);
    assert!(!source.contains("drafts"));
}

#[test]
fn test_config_template_round_trip() {
    let (_dir, project) = cargo_project();
    scaffold::init(&project, false).unwrap();

    let config = Config::load(&project.jonefile()).unwrap();
    assert_eq!(config.client, Client::Postgresql);
    assert_eq!(config.migrations.table_name, DEFAULT_MIGRATIONS_TABLE);
    assert_eq!(config.connection.database, "my_db");
}
