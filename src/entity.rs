use crate::{ColumnDef, Result, Value};

/// Compile time schema description of one database table.
///
/// Implemented through `#[derive(Entity)]`. The first declared field is the
/// primary key; its column is named `<table_name>_id` regardless of the
/// field name. Foreign key fields carry `#[silo(foreign_key)]` and have
/// another entity as their type; their column holds the target's primary
/// key and is named `<field>_id`.
///
/// Example:
///
/// ```ignore
/// #[derive(Default, Entity)]
/// struct Player {
///     #[silo(type = "char(32)")]
///     id: String,
///     #[silo(type = "boolean", with = "NOT NULL DEFAULT false")]
///     is_cool: bool,
///     #[silo(foreign_key, with = "NOT NULL")]
///     animal: Animal,
/// }
/// ```
pub trait Entity {
    /// Table name, the snake case conversion of the type name. Stable for
    /// the process lifetime.
    fn table_name() -> &'static str
    where
        Self: Sized;

    /// Ordered column descriptors, primary key first.
    fn columns() -> &'static [ColumnDef]
    where
        Self: Sized;

    /// Current field values in declaration order. Foreign key fields
    /// contribute the referenced entity's primary key value.
    fn row(&self) -> Vec<Value>;

    /// Write a coerced value into the field at `index`. For a foreign key
    /// index the value lands in the nested entity's primary key field.
    fn set(&mut self, index: usize, value: Value) -> Result<()>;

    /// Primary key value of this entity.
    fn primary_key_value(&self) -> Value;
}
