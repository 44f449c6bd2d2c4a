use crate::{Error, Result, Value};

/// Coercion target of a column, derived from the Rust field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Varchar,
    /// Foreign key field, its type is another entity.
    Entity,
}

impl TypeTag {
    /// Parse a decoded column string into a [`Value`] of this tag.
    ///
    /// `Entity` tags cannot be parsed directly, the caller resolves them to
    /// the referenced table's primary key tag first.
    pub fn coerce(&self, raw: &str, target: &'static str) -> Result<Value> {
        let error = || Error::Parse {
            value: raw.to_owned(),
            target,
        };
        Ok(match self {
            TypeTag::Varchar => Value::Varchar(raw.to_owned()),
            TypeTag::Boolean => Value::Boolean(match raw {
                "1" | "true" | "TRUE" | "True" => true,
                "0" | "false" | "FALSE" | "False" => false,
                _ => return Err(error()),
            }),
            TypeTag::Int8 => Value::Int8(raw.parse().map_err(|_| error())?),
            TypeTag::Int16 => Value::Int16(raw.parse().map_err(|_| error())?),
            TypeTag::Int32 => Value::Int32(raw.parse().map_err(|_| error())?),
            TypeTag::Int64 => Value::Int64(raw.parse().map_err(|_| error())?),
            TypeTag::UInt8 => Value::UInt8(raw.parse().map_err(|_| error())?),
            TypeTag::UInt16 => Value::UInt16(raw.parse().map_err(|_| error())?),
            TypeTag::UInt32 => Value::UInt32(raw.parse().map_err(|_| error())?),
            TypeTag::UInt64 => Value::UInt64(raw.parse().map_err(|_| error())?),
            TypeTag::Float32 => Value::Float32(raw.parse().map_err(|_| error())?),
            TypeTag::Float64 => Value::Float64(raw.parse().map_err(|_| error())?),
            TypeTag::Entity => return Err(error()),
        })
    }
}

/// Foreign key target of a column.
#[derive(Debug, Clone, Copy)]
pub struct ForeignKey {
    /// Referenced table name.
    pub table: &'static str,
    /// Referenced primary key column name.
    pub key: &'static str,
    /// Column list of the referenced entity, used to coerce a decoded
    /// reference with the target's primary key type.
    pub columns: fn() -> &'static [ColumnDef],
}

/// Declarative description of a table column, produced by
/// `#[derive(Entity)]` at expansion time. All naming and typing facts are
/// computed once, there is no runtime reflection.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    /// Derived column name (`<table>_id` for the primary key,
    /// `<field>_id` for foreign keys, snake case of the field otherwise).
    pub name: &'static str,
    /// Rust field name, unconverted.
    pub field: &'static str,
    /// Rust type name, unconverted.
    pub type_name: &'static str,
    /// Coercion target.
    pub tag: TypeTag,
    /// Declared storage type, e.g. `char(32)`, `boolean`, `timestamp`.
    pub column_type: &'static str,
    /// Constraint clause, e.g. `NOT NULL DEFAULT false`.
    pub with: &'static str,
    /// Whether this column is the primary key (always the first field).
    pub primary_key: bool,
    /// Foreign key target, if any.
    pub references: Option<ForeignKey>,
}

impl ColumnDef {
    /// Storage type of the column; foreign keys resolve to the referenced
    /// table's name instead of their own tag.
    pub fn storage_type(&self) -> &'static str {
        match &self.references {
            Some(fk) => fk.table,
            None => self.column_type,
        }
    }

    /// Type of the column in the representation MySQL stores: `boolean`
    /// becomes `tinyint(1)`, and a foreign key takes the type of the
    /// primary key it references, since that is what the column holds.
    pub fn sql_type(&self) -> String {
        let declared = match &self.references {
            Some(fk) => (fk.columns)()[0].column_type,
            None => self.column_type,
        };
        declared.replace("boolean", "tinyint(1)")
    }
}
