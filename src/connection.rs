use crate::{Error, Result};
use mysql_async::{Opts, Pool, Row, prelude::Queryable};
use url::Url;

/// Sentinel standing in for a NULL column in a decoded row.
pub const NULL_SENTINEL: &str = "\\N";

/// Pooled MySQL connection. The pool is cheap to share and safe for the
/// concurrent per table synchronization tasks; no extra locking is
/// introduced on top of it.
pub struct Connection {
    pool: Pool,
}

impl Connection {
    /// Connect using a `mysql://` URL and verify liveness with a ping.
    pub async fn connect(url: &str) -> Result<Connection> {
        let connection_error = |reason: String| Error::Connection {
            url: url.to_owned(),
            reason,
        };
        if !url.starts_with("mysql://") {
            return Err(connection_error("URL must start with `mysql://`".into()));
        }
        let url = Url::parse(url).map_err(|e| connection_error(e.to_string()))?;
        let config = Opts::from_url(url.as_str()).map_err(|e| connection_error(e.to_string()))?;
        let pool = Pool::new(config);
        let mut conn = pool
            .get_conn()
            .await
            .map_err(|e| connection_error(e.to_string()))?;
        conn.ping()
            .await
            .map_err(|e| connection_error(e.to_string()))?;
        log::info!("Connected to the database");
        Ok(Connection { pool })
    }

    /// Close every pooled connection.
    pub async fn disconnect(self) -> Result<()> {
        self.pool.disconnect().await.map_err(|e| Error::Connection {
            url: String::new(),
            reason: e.to_string(),
        })
    }

    /// Execute a statement and return the number of affected rows.
    pub async fn execute(&self, query: &str) -> Result<u64> {
        let query_error = |reason: String| Error::Query {
            query: query.to_owned(),
            reason,
        };
        let mut conn = self
            .pool
            .get_conn()
            .await
            .map_err(|e| query_error(e.to_string()))?;
        conn.query_drop(query)
            .await
            .map_err(|e| query_error(e.to_string()))?;
        Ok(conn.affected_rows())
    }

    /// Run a query and decode every row into strings, NULL columns become
    /// [`NULL_SENTINEL`].
    pub async fn fetch_rows(&self, query: &str) -> Result<Vec<Vec<String>>> {
        let query_error = |reason: String| Error::Query {
            query: query.to_owned(),
            reason,
        };
        let mut conn = self
            .pool
            .get_conn()
            .await
            .map_err(|e| query_error(e.to_string()))?;
        let rows: Vec<Row> = conn
            .query(query)
            .await
            .map_err(|e| query_error(e.to_string()))?;
        rows.iter().map(decode_row).collect()
    }

    /// First row of the query result, if any.
    pub async fn fetch_one(&self, query: &str) -> Result<Option<Vec<String>>> {
        Ok(self.fetch_rows(query).await?.into_iter().next())
    }

    /// Whether the query returned at least one row. Used as the table and
    /// row existence probe.
    pub async fn has_rows(&self, query: &str) -> Result<bool> {
        Ok(!self.fetch_rows(query).await?.is_empty())
    }
}

fn decode_row(row: &Row) -> Result<Vec<String>> {
    (0..row.len())
        .map(|i| {
            let value = row
                .as_ref(i)
                .ok_or_else(|| Error::Scan(format!("column {i} does not exist")))?;
            Ok(decode_value(value))
        })
        .collect()
}

fn decode_value(value: &mysql_async::Value) -> String {
    use mysql_async::Value::*;
    match value {
        NULL => NULL_SENTINEL.to_owned(),
        Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Int(v) => v.to_string(),
        UInt(v) => v.to_string(),
        Float(v) => v.to_string(),
        Double(v) => v.to_string(),
        Date(year, month, day, hour, minute, second, _) => format!(
            "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
        ),
        Time(negative, days, hours, minutes, seconds, _) => format!(
            "{}{:02}:{minutes:02}:{seconds:02}",
            if *negative { "-" } else { "" },
            u32::from(*hours) + u32::from(*days) * 24,
        ),
    }
}
