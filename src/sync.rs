//! Schema synchronization: compares every registered entity against the
//! live database and creates or alters tables until they match.

use crate::{Connection, Error, Registry, Result, Source, format::sql_with};
use futures::future::join_all;
use regex::Regex;
use std::sync::LazyLock;

static CREATE_TABLE_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CREATE TABLE `\w+` \((.+)\).*$").unwrap());
static COLUMN_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(\w+)`").unwrap());

/// Reconciliation policy for tables that already exist.
#[derive(Debug, Default, Clone)]
pub struct SyncOptions {
    /// Drop live columns that are no longer declared. Destructive, so the
    /// default is to keep them and log a warning instead.
    pub drop_removed_columns: bool,
}

/// Per table outcome of one synchronization pass. A failing table never
/// aborts its siblings; callers wanting all-or-nothing semantics use
/// [`SyncReport::into_result`].
#[derive(Debug, Default)]
pub struct SyncReport {
    pub created: Vec<&'static str>,
    pub altered: Vec<&'static str>,
    pub errors: Vec<(&'static str, Error)>,
}

impl SyncReport {
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fail with the first per table error, if any.
    pub fn into_result(mut self) -> Result<SyncReport> {
        match self.errors.pop() {
            Some((_, error)) => Err(error),
            None => Ok(self),
        }
    }
}

enum Outcome {
    Created,
    Reconciled(usize),
}

/// Synchronize every registered table, one cooperative task per table,
/// joined before returning. Tables that don't exist are created; tables
/// that drifted from their declaration are altered per [`SyncOptions`].
pub async fn sync_tables(db: &Connection, registry: &Registry, options: &SyncOptions) -> SyncReport {
    let tasks = registry.iter().map(|source| async move {
        (source.name(), sync_table(db, source, registry, options).await)
    });
    let mut report = SyncReport::default();
    for (table, result) in join_all(tasks).await {
        match result {
            Ok(Outcome::Created) => report.created.push(table),
            Ok(Outcome::Reconciled(statements)) if statements > 0 => report.altered.push(table),
            Ok(Outcome::Reconciled(..)) => {}
            Err(error) => {
                log::error!("Failed to synchronize `{table}`: {error}");
                report.errors.push((table, error));
            }
        }
    }
    report
}

async fn sync_table(
    db: &Connection,
    source: &Source,
    registry: &Registry,
    options: &SyncOptions,
) -> Result<Outcome> {
    let name = source.name();
    let exists = db
        .has_rows(&format!("SHOW TABLES LIKE \"{name}\""))
        .await?;
    let live = if exists {
        let row = db
            .fetch_one(&format!("SHOW CREATE TABLE {name}"))
            .await?
            .ok_or_else(|| Error::SchemaParse {
                table: name.to_owned(),
                detail: "SHOW CREATE TABLE returned no rows".to_owned(),
            })?;
        // Two column result: table name, full DDL text.
        Some(row.into_iter().nth(1).ok_or_else(|| Error::SchemaParse {
            table: name.to_owned(),
            detail: "expected a two column result".to_owned(),
        })?)
    } else {
        None
    };
    let plan = table_plan(source, registry, live.as_deref(), options)?;
    for statement in &plan {
        db.execute(statement).await?;
    }
    if exists {
        if !plan.is_empty() {
            log::info!("Reconciled table `{}` with {} statements", name, plan.len());
        }
        Ok(Outcome::Reconciled(plan.len()))
    } else {
        log::info!("Created table `{name}`");
        Ok(Outcome::Created)
    }
}

/// The `CREATE TABLE` statement for a declared entity.
pub fn create_table_sql(source: &Source) -> String {
    format!(
        "CREATE TABLE {} ({})",
        source.name(),
        source.fields("`%Name` %SQLType %With").join(",")
    )
}

/// Compute the statements bringing a table in line with its declaration.
///
/// `live` is the `SHOW CREATE TABLE` text of the existing table, or `None`
/// when the table is absent; the result is the full plan (one `CREATE
/// TABLE`, or any number of `ALTER TABLE` statements). Pure so drift
/// handling is testable without a server.
pub fn table_plan(
    source: &Source,
    registry: &Registry,
    live: Option<&str>,
    options: &SyncOptions,
) -> Result<Vec<String>> {
    let name = source.name();
    for column in source.columns() {
        if let Some(fk) = &column.references {
            if !registry.contains(fk.table) {
                return Err(Error::Unregistered(fk.table));
            }
        }
    }
    let Some(live) = live else {
        return Ok(vec![create_table_sql(source)]);
    };
    let live = live.replace('\n', "");
    let body = CREATE_TABLE_BODY
        .captures(&live)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| Error::SchemaParse {
            table: name.to_owned(),
            detail: format!("cannot extract the column list from `{live}`"),
        })?
        .as_str();

    let mut plan = vec![];
    let mut seen = vec![false; source.columns().len()];
    for clause in split_clauses(body) {
        if is_constraint_clause(&clause) {
            continue;
        }
        let column_name = COLUMN_NAME
            .captures(&clause)
            .and_then(|captures| captures.get(1))
            .ok_or_else(|| Error::SchemaParse {
                table: name.to_owned(),
                detail: format!("cannot extract a column name from `{clause}`"),
            })?
            .as_str();
        let Some(index) = source
            .columns()
            .iter()
            .position(|column| column.name == column_name)
        else {
            if options.drop_removed_columns {
                plan.push(format!("ALTER TABLE {name} DROP COLUMN `{column_name}`"));
            } else {
                log::warn!(
                    "Column `{column_name}` of `{name}` is no longer declared, \
                     keeping it (enable drop_removed_columns to drop)"
                );
            }
            continue;
        };
        seen[index] = true;
        let column = &source.columns()[index];
        let (live_type, live_with) = split_column_clause(&clause);
        let declared_with = sql_with(column.with);
        // MySQL forces NOT NULL onto primary key columns, ignore it there.
        let mut declared_clause = normalize_clause(&declared_with);
        let mut live_clause = normalize_clause(live_with);
        if column.primary_key {
            declared_clause = normalize_clause(&declared_clause.replace("not null", ""));
            live_clause = normalize_clause(&live_clause.replace("not null", ""));
        }
        if !type_matches(&column.sql_type(), live_type) || declared_clause != live_clause {
            plan.push(format!(
                "ALTER TABLE {name} MODIFY COLUMN `{}` {} {}",
                column.name,
                column.sql_type(),
                declared_with
            ));
        }
    }
    for (index, column) in source.columns().iter().enumerate() {
        if !seen[index] {
            plan.push(format!(
                "ALTER TABLE {name} ADD COLUMN `{}` {} {}",
                column.name,
                column.sql_type(),
                sql_with(column.with)
            ));
        }
    }
    Ok(plan
        .into_iter()
        .map(|statement| statement.trim_end().to_owned())
        .collect())
}

/// Split the parenthesized `CREATE TABLE` body at top level commas only;
/// storage types like `decimal(10,2)` carry commas of their own.
fn split_clauses(body: &str) -> Vec<String> {
    let mut clauses = vec![];
    let mut current = String::new();
    let mut depth = 0u32;
    for c in body.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                clauses.push(current.trim().to_owned());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        clauses.push(current.trim().to_owned());
    }
    clauses
}

fn is_constraint_clause(clause: &str) -> bool {
    ["PRIMARY KEY", "UNIQUE KEY", "KEY ", "KEY(", "CONSTRAINT", "FOREIGN KEY"]
        .iter()
        .any(|prefix| clause.starts_with(prefix))
}

/// Break a live column clause into its type and the trailing constraint
/// text: `` `active` tinyint(1) NOT NULL `` becomes `("tinyint(1)", "NOT
/// NULL")``.
fn split_column_clause(clause: &str) -> (&str, &str) {
    let rest = clause
        .split_once(' ')
        .map(|(_name, rest)| rest.trim())
        .unwrap_or("");
    match rest.split_once(' ') {
        Some((column_type, with)) => (column_type, with.trim()),
        None => (rest, ""),
    }
}

fn type_matches(declared: &str, live: &str) -> bool {
    declared.eq_ignore_ascii_case(live)
}

/// Comparison form of a constraint clause: lowercase, collapsed
/// whitespace, and without the implicit `DEFAULT NULL` MySQL appends to
/// nullable columns.
fn normalize_clause(clause: &str) -> String {
    let mut normalized = clause.to_lowercase().replace("default null", "");
    while normalized.contains("  ") {
        normalized = normalized.replace("  ", " ");
    }
    normalized.trim().to_owned()
}
