//! Single table entity operations: claim (insert if absent), delete and
//! populate (select plus type coercion back into the fields).
//!
//! The statement builders are pure and public so every query shape can be
//! asserted without a server; the async wrappers run them on a
//! [`Connection`].

use crate::{Connection, Entity, Error, NULL_SENTINEL, Result, Source, TypeTag};

/// Create a row if it doesn't exist, keyed by the primary key. Calling it
/// twice with the same primary key issues exactly one `INSERT`. The entity
/// is returned as passed; auto generated keys are not read back.
pub async fn claim_entity<E: Entity>(db: &Connection, entity: E) -> Result<E> {
    let source = Source::of(&entity);
    if db.has_rows(&claim_probe_sql(&source)).await? {
        return Ok(entity);
    }
    db.execute(&insert_sql(&source)).await?;
    log::info!("Claimed entity in `{}`", source.name());
    Ok(entity)
}

/// Delete the row matching the entity's primary key, and nothing else.
/// Whether a row existed is not checked.
pub async fn delete_entity<E: Entity>(db: &Connection, entity: E) -> Result<E> {
    let source = Source::of(&entity);
    db.execute(&delete_sql(&source)).await?;
    log::info!("Deleted entity from `{}`", source.name());
    Ok(entity)
}

/// Fill every unset field of the entity from the database.
///
/// Defined fields (value differs from the type's zero value) form the
/// `WHERE` predicate and are never written back; unset fields form the
/// `SELECT` list. Returns the entity and whether any field was written.
///
/// `recursive` controls foreign key columns: when `false` they are left
/// out of the select entirely; when `true` the stored reference is coerced
/// with the target table's primary key type and written into the nested
/// entity's primary key field. Deeper hydration is an explicit follow-up
/// `populate` on that field, which keeps cyclic graphs bounded.
pub async fn populate<E: Entity>(
    db: &Connection,
    mut entity: E,
    recursive: bool,
) -> Result<(E, bool)> {
    let source = Source::of(&entity);
    let Some((query, targets)) = populate_sql(&source, recursive)? else {
        return Ok((entity, false));
    };
    let Some(row) = db.fetch_one(&query).await? else {
        return Ok((entity, false));
    };
    let written = apply_row(&mut entity, &source, &targets, &row)?;
    Ok((entity, written))
}

/// The row existence probe issued by [`claim_entity`].
pub fn claim_probe_sql(source: &Source) -> String {
    format!(
        "SELECT {} FROM {} WHERE {}",
        source.columns()[0].name,
        source.name(),
        source.format_field("%Name=%Value", 0),
    )
}

/// Insert over the full ordered field list; foreign keys contribute the
/// referenced primary key value.
pub fn insert_sql(source: &Source) -> String {
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        source.name(),
        source.fields("%Name").join(","),
        source.fields("%Value").join(","),
    )
}

/// Delete restricted to exactly the primary key predicate.
pub fn delete_sql(source: &Source) -> String {
    format!(
        "DELETE FROM {} WHERE {}",
        source.name(),
        source.format_field("%Name=%Value", 0),
    )
}

/// The select issued by [`populate`] plus the indices of the fields the
/// result columns map to. `None` when every eligible field is already
/// defined.
pub fn populate_sql(source: &Source, recursive: bool) -> Result<Option<(String, Vec<usize>)>> {
    let defined = source.indices(true);
    if defined.is_empty() {
        return Err(Error::NoCriteria(source.name()));
    }
    let targets: Vec<usize> = source
        .indices(false)
        .into_iter()
        .filter(|i| recursive || source.columns()[*i].references.is_none())
        .collect();
    if targets.is_empty() {
        return Ok(None);
    }
    let select = targets
        .iter()
        .map(|i| source.format_field("%SQLName", *i))
        .collect::<Vec<_>>()
        .join(", ");
    let predicate = defined
        .iter()
        .map(|i| source.format_field("%Name=%Value", *i))
        .collect::<Vec<_>>()
        .join(" AND ");
    Ok(Some((
        format!(
            "SELECT {} FROM {} WHERE {} LIMIT 1",
            select,
            source.name(),
            predicate
        ),
        targets,
    )))
}

/// Coerce a decoded row into the entity fields listed in `targets`. Empty
/// and NULL columns are skipped. Returns whether anything was written.
pub fn apply_row<E: Entity>(
    entity: &mut E,
    source: &Source,
    targets: &[usize],
    row: &[String],
) -> Result<bool> {
    if row.len() != targets.len() {
        return Err(Error::Scan(format!(
            "expected {} columns for `{}`, got {}",
            targets.len(),
            source.name(),
            row.len()
        )));
    }
    let mut written = false;
    for (index, raw) in targets.iter().zip(row) {
        if raw.is_empty() || raw == NULL_SENTINEL {
            continue;
        }
        let column = &source.columns()[*index];
        let value = match (column.tag, &column.references) {
            // Coerce a stored reference with the target's primary key type.
            (TypeTag::Entity, Some(fk)) => {
                let key = &(fk.columns)()[0];
                key.tag.coerce(raw, key.type_name)?
            }
            (TypeTag::Entity, None) => {
                return Err(Error::Scan(format!(
                    "column `{}` of `{}` has an entity type but no foreign key target",
                    column.name,
                    source.name()
                )));
            }
            (tag, _) => tag.coerce(raw, column.type_name)?,
        };
        entity.set(*index, value)?;
        written = true;
    }
    Ok(written)
}
