//! Token substitution engine turning one struct field into a SQL fragment.
//!
//! A template is a string with zero or more recognized tokens; rendering
//! substitutes every occurrence of every token, collapses duplicate
//! whitespace and trims. Composite templates such as `` `%Name` %SQLType
//! %With `` are rendered per field and joined by callers into full
//! clauses.

use crate::Source;

type Handler = fn(&Source, usize) -> String;

/// All recognized field formattings.
const TOKENS: &[(&str, Handler)] = &[
    ("%RawName", raw_name),
    ("%SQLType", sql_type),
    ("%SQLName", sql_name),
    ("%Variable", variable),
    ("%Value", value),
    ("%Name", name),
    ("%Type", storage_type),
    ("%Tags", tags),
    ("%With", with),
];

/// Render the field at `index` under `template`.
pub fn render(source: &Source, template: &str, index: usize) -> String {
    let mut result = template.to_owned();
    for (token, handler) in TOKENS {
        if result.contains(token) {
            result = result.replace(token, &handler(source, index));
        }
    }
    while result.contains("  ") {
        result = result.replace("  ", " ");
    }
    result.trim().to_owned()
}

/// Rewrite boolean keywords to their storage representation. Applied to
/// every constraint clause before it reaches DDL, so the literals `true`
/// and `false` never appear in generated statements.
pub fn sql_with(value: &str) -> String {
    value.replace("true", "'1'").replace("false", "'0'")
}

fn name(source: &Source, index: usize) -> String {
    source.columns()[index].name.to_owned()
}

fn storage_type(source: &Source, index: usize) -> String {
    source.columns()[index].storage_type().to_owned()
}

fn with(source: &Source, index: usize) -> String {
    let column = &source.columns()[index];
    if column.primary_key {
        format!("PRIMARY KEY {}", sql_with(column.with))
    } else {
        sql_with(column.with)
    }
}

fn tags(source: &Source, index: usize) -> String {
    let column = &source.columns()[index];
    format!(r#"type:"{}" with:"{}""#, column.column_type, column.with)
}

fn value(source: &Source, index: usize) -> String {
    let column = &source.columns()[index];
    let value = source.value(index);
    // Foreign keys already carry the referenced primary key in the row.
    if column.column_type == "timestamp" && column.references.is_none() {
        return format!("FROM_UNIXTIME({})", value.literal());
    }
    value.literal()
}

fn raw_name(source: &Source, index: usize) -> String {
    source.columns()[index].field.to_owned()
}

fn variable(source: &Source, index: usize) -> String {
    source.columns()[index].type_name.to_owned()
}

fn sql_type(source: &Source, index: usize) -> String {
    source.columns()[index].sql_type()
}

fn sql_name(source: &Source, index: usize) -> String {
    let column = &source.columns()[index];
    if column.storage_type() == "timestamp" {
        format!("UNIX_TIMESTAMP({})", column.name)
    } else {
        column.name.to_owned()
    }
}
