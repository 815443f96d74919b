//! Integration tests for registry ordering and run planning.

use jone_core::{
    Direction, Migration, MigrationError, MigrationPlanner, MigrationState, PostgresDialect,
    Registration, Registry, Schema,
};

fn noop(_: &mut Schema) {}

struct CreateUsers;

impl Migration for CreateUsers {
    const NAME: &'static str = "20260114035749_create_users";

    fn up(schema: &mut Schema) {
        schema.create_table("users", |t| {
            t.increments("id");
            t.string("email").not_nullable().unique();
        });
    }

    fn down(schema: &mut Schema) {
        schema.drop_table("users");
    }
}

struct AddNickname;

impl Migration for AddNickname {
    const NAME: &'static str = "20260115090000_add_nickname";

    fn up(schema: &mut Schema) {
        schema.table("users", |t| {
            t.string("nickname");
        });
    }

    fn down(schema: &mut Schema) {
        schema.table("users", |t| {
            t.drop_column("nickname");
        });
    }
}

#[test]
fn registry_orders_by_numeric_prefix() {
    let registry = Registry::new(vec![
        Registration::new("2_b", noop, noop),
        Registration::new("10_a", noop, noop),
        Registration::new("1_c", noop, noop),
    ])
    .unwrap();

    let planner = MigrationPlanner::new(PostgresDialect::new());

    let up: Vec<_> = planner
        .plan_all(registry.units(), Direction::Up)
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(up, ["1_c", "2_b", "10_a"]);

    let down: Vec<_> = planner
        .plan_all(registry.units(), Direction::Down)
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(down, ["10_a", "2_b", "1_c"]);
}

#[test]
fn registry_rejects_unprefixed_names() {
    let err = Registry::new(vec![Registration::new("registry", noop, noop)]).unwrap_err();
    assert!(matches!(err, MigrationError::InvalidName(ref name) if name == "registry"));
    assert!(err.to_string().contains("numeric prefix"));
}

#[test]
fn typed_units_plan_both_directions() {
    let registry = Registry::new(vec![
        Registration::of::<AddNickname>(),
        Registration::of::<CreateUsers>(),
    ])
    .unwrap();
    let planner = MigrationPlanner::new(PostgresDialect::new());

    let up = planner.plan_all(registry.units(), Direction::Up);
    assert_eq!(up[0].alias, "m20260114035749");
    assert_eq!(
        up[0].statements,
        ["CREATE TABLE \"users\" (\n  \"id\" SERIAL PRIMARY KEY,\n  \"email\" VARCHAR(255) NOT NULL UNIQUE\n);"]
    );
    assert_eq!(
        up[1].statements,
        ["ALTER TABLE \"users\" ADD COLUMN \"nickname\" VARCHAR(255);"]
    );

    let down = planner.plan_all(registry.units(), Direction::Down);
    assert_eq!(
        down[0].statements,
        ["ALTER TABLE \"users\" DROP COLUMN \"nickname\";"]
    );
    assert_eq!(down[1].statements, ["DROP TABLE \"users\";"]);
}

#[test]
fn state_drives_selection() {
    let registry = Registry::new(vec![
        Registration::of::<CreateUsers>(),
        Registration::of::<AddNickname>(),
    ])
    .unwrap();

    let mut state = MigrationState::new();
    let pending: Vec<_> = state
        .pending(&registry)
        .iter()
        .map(Registration::name)
        .collect();
    assert_eq!(pending, [CreateUsers::NAME, AddNickname::NAME]);

    state.mark_applied(CreateUsers::NAME);
    let next = state.next_pending(&registry, None).unwrap().unwrap();
    assert_eq!(next.name(), AddNickname::NAME);

    let last = state.last_applied(&registry, None).unwrap().unwrap();
    assert_eq!(last.name(), CreateUsers::NAME);
}
