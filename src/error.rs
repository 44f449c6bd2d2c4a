use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds surfaced by the library. Every operation returns a typed
/// error so callers can decide whether one table's failure aborts a whole
/// synchronization batch.
#[derive(Error, Debug)]
pub enum Error {
    /// The driver failed to open a connection or failed the liveness check.
    #[error("cannot connect to `{url}`: {reason}")]
    Connection { url: String, reason: String },

    /// A query or execute call was rejected by the server.
    #[error("query failed: {query}: {reason}")]
    Query { query: String, reason: String },

    /// A result row could not be decoded.
    #[error("cannot decode row: {0}")]
    Scan(String),

    /// A decoded column string could not be coerced into the field type.
    #[error("cannot parse `{value}` as {target}")]
    Parse { value: String, target: &'static str },

    /// The live `CREATE TABLE` text did not match the expected structure.
    #[error("unexpected schema text for table `{table}`: {detail}")]
    SchemaParse { table: String, detail: String },

    /// A foreign key points at a table that was never registered.
    #[error("table `{0}` is not registered")]
    Unregistered(&'static str),

    /// Populate was called with every field unset, the predicate would be
    /// empty.
    #[error("populate requires at least one defined field on `{0}`")]
    NoCriteria(&'static str),
}
