//! Example: Blog Application Migrations
//!
//! Registers three units for a blog (users, posts, an email index), applies
//! them to an in-memory SQLite database, then rolls the last one back.
//!
//! Run with: cargo run --example blog_migrations -p jone-migrate

use jone_core::{
    Direction, ForeignKeyAction, Migration, PostgresDialect, Registration, Registry, Schema,
};
use jone_migrate::prelude::*;
use sqlx::any::AnyPoolOptions;

// =============================================================================
// Migration Definitions
// =============================================================================

/// Create the users table.
struct CreateUsers;

impl Migration for CreateUsers {
    const NAME: &'static str = "20260114035749_create_users";

    fn up(schema: &mut Schema) {
        schema.create_table("users", |t| {
            t.increments("id");
            t.string("username").length(100).not_nullable().unique();
            t.string("email").not_nullable();
            t.boolean("is_active").not_nullable().default(true);
            t.timestamps();
        });
    }

    fn down(schema: &mut Schema) {
        schema.drop_table("users");
    }
}

/// Create the posts table, owned by users.
struct CreatePosts;

impl Migration for CreatePosts {
    const NAME: &'static str = "20260114040210_create_posts";

    fn up(schema: &mut Schema) {
        schema.create_table("posts", |t| {
            t.increments("id");
            t.int("author_id").not_nullable();
            t.string("title").length(200).not_nullable();
            t.text("content").comment("Markdown body");
            t.timestamps();
            t.foreign("author_id")
                .references("users", "id")
                .on_delete(ForeignKeyAction::Cascade);
        });
    }

    fn down(schema: &mut Schema) {
        schema.drop_table("posts");
    }
}

/// Index user emails.
struct IndexUserEmail;

impl Migration for IndexUserEmail {
    const NAME: &'static str = "20260115091500_index_user_email";

    fn up(schema: &mut Schema) {
        schema.table("users", |t| {
            t.unique(&["email"]);
        });
    }

    fn down(schema: &mut Schema) {
        schema.raw("DROP INDEX \"uq_users_email\";");
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("{}", "=".repeat(70));
    println!(" JONE: Blog Application Example");
    println!("{}", "=".repeat(70));
    println!();

    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    let registry = Registry::new(vec![
        Registration::of::<IndexUserEmail>(),
        Registration::of::<CreateUsers>(),
        Registration::of::<CreatePosts>(),
    ])?;

    println!("[1] Registered units, in run order:");
    for unit in &registry {
        println!("    - {} ({})", unit.name(), unit.alias());
    }
    println!();

    let migrator = Migrator::new(
        registry,
        PostgresDialect::new(),
        pool,
        DEFAULT_MIGRATIONS_TABLE,
    );

    println!("[2] Generated SQL:");
    println!("{}", "-".repeat(70));
    let mut out = std::io::stdout().lock();
    migrator.write_sql(&mut out, Direction::Up)?;
    drop(out);
    println!("{}", "-".repeat(70));
    println!();

    println!("[3] Applying migrations...");
    let report = migrator.latest().await?;
    println!("    {} applied", report.completed.len());
    println!();

    println!("[4] Rolling back the last migration...");
    let report = migrator.down(None).await?;
    println!("    reverted {:?}", report.completed);
    println!();

    println!("[5] Status:");
    let status = migrator.status().await?;
    for entry in &status.entries {
        let mark = if entry.applied_at.is_some() { "X" } else { " " };
        println!("    [{mark}] {}", entry.name);
    }

    Ok(())
}
