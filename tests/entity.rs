use silo::{Entity, TypeTag, Value};

#[derive(Default, Entity)]
struct UserProfile {
    #[silo(type = "char(32)", primary_key)]
    id: String,
    #[silo(type = "varchar(64)", with = "NOT NULL")]
    display_name: String,
    #[silo(type = "int")]
    age: i32,
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
    #[silo(type = "boolean", with = "NOT NULL DEFAULT false")]
    is_cool: bool,
}

#[test]
fn table_name_is_snake_case_of_the_type() {
    assert_eq!(UserProfile::table_name(), "user_profile");
    assert_eq!(Player::table_name(), "player");
}

#[test]
fn primary_key_column_is_named_after_the_table() {
    // The Rust field is `id`, the column follows the table name.
    assert_eq!(UserProfile::columns()[0].name, "user_profile_id");
    assert!(UserProfile::columns()[0].primary_key);
    assert_eq!(Player::columns()[0].name, "player_id");
}

#[test]
fn column_metadata() {
    let columns = UserProfile::columns();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[1].name, "display_name");
    assert_eq!(columns[1].field, "display_name");
    assert_eq!(columns[1].type_name, "String");
    assert_eq!(columns[1].tag, TypeTag::Varchar);
    assert_eq!(columns[1].column_type, "varchar(64)");
    assert_eq!(columns[1].with, "NOT NULL");
    assert!(!columns[1].primary_key);
    assert!(columns[1].references.is_none());
    assert_eq!(columns[2].tag, TypeTag::Int32);
    assert_eq!(columns[2].with, "");
}

#[test]
fn foreign_key_column() {
    let columns = Player::columns();
    assert_eq!(columns[1].name, "animal_id");
    assert_eq!(columns[1].tag, TypeTag::Entity);
    let fk = columns[1].references.expect("animal is a foreign key");
    assert_eq!(fk.table, "animal");
    assert_eq!(fk.key, "animal_id");
    assert_eq!((fk.columns)().len(), 2);
    assert_eq!((fk.columns)()[0].tag, TypeTag::Varchar);
    // %Type resolves to the referenced table, not the storage tag.
    assert_eq!(columns[1].storage_type(), "animal");
}

#[test]
fn row_carries_foreign_primary_keys() {
    let player = Player {
        id: "p1".into(),
        animal: Animal {
            id: "a7".into(),
            name: "Rex".into(),
        },
        is_cool: true,
    };
    assert_eq!(
        player.row(),
        vec![
            Value::Varchar("p1".into()),
            Value::Varchar("a7".into()),
            Value::Boolean(true),
        ]
    );
    assert_eq!(player.primary_key_value(), Value::Varchar("p1".into()));
}

#[test]
fn set_writes_fields_and_rejects_mismatches() {
    let mut profile = UserProfile::default();
    profile.set(1, Value::Varchar("Bob".into())).unwrap();
    profile.set(2, Value::Int32(30)).unwrap();
    assert_eq!(profile.display_name, "Bob");
    assert_eq!(profile.age, 30);
    assert!(profile.set(2, Value::Varchar("thirty".into())).is_err());
    assert!(profile.set(9, Value::Int32(1)).is_err());
}

#[test]
fn set_on_a_foreign_key_reaches_the_nested_primary_key() {
    let mut player = Player::default();
    player.set(1, Value::Varchar("a7".into())).unwrap();
    assert_eq!(player.animal.id, "a7");
}
