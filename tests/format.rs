use silo::{Entity, Source, format::sql_with};

#[derive(Default, Entity)]
struct Session {
    #[silo(type = "char(32)")]
    id: String,
    #[silo(type = "boolean", with = "NOT NULL DEFAULT false")]
    active: bool,
    #[silo(type = "timestamp", with = "NOT NULL")]
    started: i64,
    #[silo(type = "varchar(64)")]
    label: String,
}

fn session() -> Session {
    Session {
        id: "s1".into(),
        active: true,
        started: 120,
        label: "morning".into(),
    }
}

#[test]
fn name_tokens() {
    let source = Source::of(&session());
    assert_eq!(source.format_field("%Name", 0), "session_id");
    assert_eq!(source.format_field("%Name", 1), "active");
    assert_eq!(source.format_field("%RawName", 0), "id");
    assert_eq!(source.format_field("%Variable", 1), "bool");
}

#[test]
fn with_token_forces_primary_key_and_normalizes_booleans() {
    let source = Source::of(&session());
    assert_eq!(source.format_field("%With", 0), "PRIMARY KEY");
    let with = source.format_field("%With", 1);
    assert_eq!(with, "NOT NULL DEFAULT '0'");
    assert!(!with.contains("false"));
}

#[test]
fn value_token() {
    let source = Source::of(&session());
    // Booleans take their storage representation.
    assert_eq!(source.format_field("%Value", 1), "'1'");
    // Timestamps wrap the stored unix seconds.
    assert_eq!(source.format_field("%Value", 2), "FROM_UNIXTIME(120)");
    // Strings are double quoted.
    assert_eq!(source.format_field("%Value", 3), "\"morning\"");
}

#[test]
fn value_token_escapes_quotes() {
    let source = Source::of(&Session {
        label: "mor\"ning".into(),
        ..session()
    });
    assert_eq!(source.format_field("%Value", 3), r#""mor\"ning""#);
}

#[test]
fn sql_type_and_sql_name_tokens() {
    let source = Source::of(&session());
    assert_eq!(source.format_field("%SQLType", 1), "tinyint(1)");
    assert_eq!(source.format_field("%SQLType", 3), "varchar(64)");
    assert_eq!(source.format_field("%SQLName", 2), "UNIX_TIMESTAMP(started)");
    assert_eq!(source.format_field("%SQLName", 1), "active");
}

#[test]
fn tags_token_is_diagnostic() {
    let source = Source::of(&session());
    assert_eq!(
        source.format_field("%Tags", 1),
        r#"type:"boolean" with:"NOT NULL DEFAULT false""#
    );
}

#[test]
fn composite_templates_collapse_whitespace() {
    let source = Source::of(&session());
    // `label` has no with clause, the doubled space must collapse away.
    assert_eq!(
        source.format_field("`%Name` %SQLType %With", 3),
        "`label` varchar(64)"
    );
    assert_eq!(
        source.format_field("`%Name` %SQLType %With", 1),
        "`active` tinyint(1) NOT NULL DEFAULT '0'"
    );
}

#[test]
fn fields_and_containment() {
    let source = Source::of(&session());
    let fields = source.fields("%Name");
    assert_eq!(fields, ["session_id", "active", "started", "label"]);
    assert!(source.fields_contain("%Name", "ACTIVE"));
    assert!(!source.fields_contain("%Name", "missing"));
}

#[test]
fn properties_split_on_defined_fields() {
    let entity = Session {
        id: "s1".into(),
        ..Default::default()
    };
    let source = Source::of(&entity);
    assert_eq!(source.properties("%Name=%Value", true), [r#"session_id="s1""#]);
    assert_eq!(source.indices(false), [1, 2, 3]);
}

#[test]
fn sql_with_rewrites_boolean_keywords() {
    assert_eq!(sql_with("DEFAULT true"), "DEFAULT '1'");
    assert_eq!(sql_with("NOT NULL DEFAULT false"), "NOT NULL DEFAULT '0'");
    assert_eq!(sql_with("NOT NULL"), "NOT NULL");
}
