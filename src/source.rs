use crate::{ColumnDef, Entity, Value, format};

/// Snapshot of one entity value together with its column metadata. The
/// source is what the format engine, the synchronizer and the CRUD
/// operations introspect instead of the live Rust value.
#[derive(Debug, Clone)]
pub struct Source {
    table: &'static str,
    columns: &'static [ColumnDef],
    row: Vec<Value>,
}

impl Source {
    pub fn of<E: Entity>(entity: &E) -> Self {
        Source {
            table: E::table_name(),
            columns: E::columns(),
            row: entity.row(),
        }
    }

    /// Table name of the underlying entity.
    pub fn name(&self) -> &'static str {
        self.table
    }

    pub fn columns(&self) -> &'static [ColumnDef] {
        self.columns
    }

    pub fn value(&self, index: usize) -> &Value {
        &self.row[index]
    }

    /// Whether the field at `index` holds a non zero value.
    pub fn defined(&self, index: usize) -> bool {
        !self.row[index].is_zero()
    }

    /// Render one field under the given template.
    pub fn format_field(&self, template: &str, index: usize) -> String {
        format::render(self, template, index)
    }

    /// All fields rendered under the template, in declaration order. The
    /// primary key is included; its `%With` expansion carries the
    /// `PRIMARY KEY` clause so full column listings come out right.
    pub fn fields(&self, template: &str) -> Vec<String> {
        (0..self.columns.len())
            .map(|i| self.format_field(template, i))
            .collect()
    }

    /// Case insensitive check whether the rendered field list contains
    /// `value`.
    pub fn fields_contain(&self, template: &str, value: &str) -> bool {
        let value = value.to_lowercase();
        self.fields(template)
            .iter()
            .any(|field| field.to_lowercase() == value)
    }

    /// Fields whose defined-ness matches the flag, rendered under the
    /// template.
    pub fn properties(&self, template: &str, defined: bool) -> Vec<String> {
        self.indices(defined)
            .into_iter()
            .map(|i| self.format_field(template, i))
            .collect()
    }

    /// Indices of the fields whose defined-ness matches the flag.
    pub fn indices(&self, defined: bool) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|i| self.defined(*i) == defined)
            .collect()
    }
}
