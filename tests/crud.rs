use silo::{
    Entity, Error, NULL_SENTINEL, Source, apply_row, claim_probe_sql, delete_sql, insert_sql,
    populate_sql,
};

#[derive(Default, Entity)]
struct Account {
    #[silo(type = "char(32)")]
    id: String,
    #[silo(type = "varchar(64)", with = "NOT NULL")]
    name: String,
    #[silo(type = "boolean", with = "NOT NULL DEFAULT false")]
    active: bool,
    #[silo(type = "timestamp")]
    last_seen: i64,
}

#[derive(Default, Entity)]
struct Animal {
    #[silo(type = "char(32)")]
    id: String,
    #[silo(type = "varchar(64)")]
    name: String,
}

#[derive(Default, Entity)]
struct Player {
    #[silo(type = "char(32)")]
    id: String,
    #[silo(foreign_key, with = "NOT NULL")]
    animal: Animal,
}

fn account() -> Account {
    Account {
        id: "a1".into(),
        name: "Bob".into(),
        active: true,
        last_seen: 120,
    }
}

#[test]
fn claim_probes_by_primary_key_only() {
    let source = Source::of(&account());
    assert_eq!(
        claim_probe_sql(&source),
        r#"SELECT account_id FROM account WHERE account_id="a1""#
    );
}

#[test]
fn insert_covers_the_full_field_list() {
    let source = Source::of(&account());
    assert_eq!(
        insert_sql(&source),
        "INSERT INTO account (account_id,name,active,last_seen) \
         VALUES (\"a1\",\"Bob\",'1',FROM_UNIXTIME(120))"
    );
}

#[test]
fn insert_substitutes_foreign_keys_with_their_primary_key() {
    let player = Player {
        id: "p1".into(),
        animal: Animal {
            id: "a7".into(),
            name: "Rex".into(),
        },
    };
    let source = Source::of(&player);
    assert_eq!(
        insert_sql(&source),
        r#"INSERT INTO player (player_id,animal_id) VALUES ("p1","a7")"#
    );
}

#[test]
fn delete_is_scoped_to_the_primary_key() {
    let source = Source::of(&account());
    assert_eq!(
        delete_sql(&source),
        r#"DELETE FROM account WHERE account_id="a1""#
    );
}

#[test]
fn populate_selects_unset_fields_by_defined_predicate() {
    let entity = Account {
        id: "a1".into(),
        ..Default::default()
    };
    let source = Source::of(&entity);
    let (query, targets) = populate_sql(&source, false).unwrap().unwrap();
    assert_eq!(
        query,
        "SELECT name, active, UNIX_TIMESTAMP(last_seen) FROM account \
         WHERE account_id=\"a1\" LIMIT 1"
    );
    assert_eq!(targets, [1, 2, 3]);
}

#[test]
fn populate_requires_a_predicate() {
    let source = Source::of(&Account::default());
    assert!(matches!(
        populate_sql(&source, false),
        Err(Error::NoCriteria("account"))
    ));
}

#[test]
fn populate_with_nothing_to_fetch_is_a_noop() {
    let source = Source::of(&account());
    assert!(populate_sql(&source, false).unwrap().is_none());
}

#[test]
fn recursive_flag_gates_foreign_key_columns() {
    let entity = Player {
        id: "p1".into(),
        ..Default::default()
    };
    let source = Source::of(&entity);
    assert!(populate_sql(&source, false).unwrap().is_none());
    let (query, targets) = populate_sql(&source, true).unwrap().unwrap();
    assert_eq!(
        query,
        r#"SELECT animal_id FROM player WHERE player_id="p1" LIMIT 1"#
    );
    assert_eq!(targets, [1]);
}

#[test]
fn apply_row_coerces_and_reports_writes() {
    let mut entity = Account {
        id: "a1".into(),
        ..Default::default()
    };
    let source = Source::of(&entity);
    let row = ["Bob".to_owned(), "1".to_owned(), "120".to_owned()];
    let written = apply_row(&mut entity, &source, &[1, 2, 3], &row).unwrap();
    assert!(written);
    assert_eq!(entity.name, "Bob");
    assert!(entity.active);
    assert_eq!(entity.last_seen, 120);
    // The predicate field was never rewritten.
    assert_eq!(entity.id, "a1");
}

#[test]
fn apply_row_skips_empty_and_null_columns() {
    let mut entity = Account {
        id: "a1".into(),
        ..Default::default()
    };
    let source = Source::of(&entity);
    let row = [String::new(), NULL_SENTINEL.to_owned(), String::new()];
    let written = apply_row(&mut entity, &source, &[1, 2, 3], &row).unwrap();
    assert!(!written);
    assert_eq!(entity.name, "");
}

#[test]
fn apply_row_checks_arity_and_parse_failures() {
    let mut entity = Account {
        id: "a1".into(),
        ..Default::default()
    };
    let source = Source::of(&entity);
    assert!(matches!(
        apply_row(&mut entity, &source, &[1, 2, 3], &["Bob".to_owned()]),
        Err(Error::Scan(..))
    ));
    let row = ["Bob".to_owned(), "maybe".to_owned(), "120".to_owned()];
    assert!(matches!(
        apply_row(&mut entity, &source, &[1, 2, 3], &row),
        Err(Error::Parse { .. })
    ));
}

#[test]
fn apply_row_writes_a_foreign_reference_into_the_nested_key() {
    let mut player = Player {
        id: "p1".into(),
        ..Default::default()
    };
    let source = Source::of(&player);
    let written = apply_row(&mut player, &source, &[1], &["a7".to_owned()]).unwrap();
    assert!(written);
    assert_eq!(player.animal.id, "a7");
    // Deeper hydration stays an explicit follow-up call.
    assert_eq!(player.animal.name, "");
}
