use crate::{Entity, Source};
use std::collections::HashMap;

/// Mapping from table name to one representative entity value, built once
/// at startup and treated as immutable afterwards. The synchronizer
/// iterates it and resolves foreign key targets against it; registering a
/// table twice overwrites the earlier snapshot.
#[derive(Debug, Default)]
pub struct Registry {
    tables: HashMap<&'static str, Source>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one entity under its table name. Call for every table
    /// (foreign key targets included) before synchronization.
    pub fn register<E: Entity>(&mut self, entity: &E) {
        self.tables.insert(E::table_name(), Source::of(entity));
    }

    /// Builder flavor of [`Registry::register`].
    pub fn with<E: Entity>(mut self, entity: &E) -> Self {
        self.register(entity);
        self
    }

    pub fn get(&self, table: &str) -> Option<&Source> {
        self.tables.get(table)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
