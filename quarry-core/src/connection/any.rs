//! `Connection` backed by an `sqlx::AnyPool`

use sqlx::any::{AnyArguments, AnyPoolOptions, AnyRow};
use sqlx::query::Query as SqlxQuery;
use sqlx::{Any, AnyPool, Column as _, Row as _};

use super::{Connection, Execution, Row};
use crate::{Result, Value};

/// SQLx connection pool wrapper
///
/// The driver is picked from the URL scheme; enable the matching `postgres`,
/// `mysql` or `sqlite` crate feature.
#[derive(Debug, Clone)]
pub struct SqlxConnection {
    inner: AnyPool,
    numbered_placeholders: bool,
}

impl SqlxConnection {
    /// Connect to the database at `url`
    pub async fn connect(url: &str) -> Result<Self> {
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new().connect(url).await?;
        Ok(Self::from_pool(pool, url))
    }

    /// Wrap an existing pool; `url` decides the placeholder style
    pub fn from_pool(pool: AnyPool, url: &str) -> Self {
        Self {
            inner: pool,
            numbered_placeholders: url.starts_with("postgres"),
        }
    }

    fn prepare<'q>(&self, sql: &'q str) -> std::borrow::Cow<'q, str> {
        if self.numbered_placeholders {
            std::borrow::Cow::Owned(number_placeholders(sql))
        } else {
            std::borrow::Cow::Borrowed(sql)
        }
    }
}

impl Connection for SqlxConnection {
    async fn select(&self, sql: &str, bindings: &[Value]) -> Result<Vec<Row>> {
        let sql = self.prepare(sql);
        let query = bind_values_to_query(sqlx::query(&sql), bindings);
        let rows = query.fetch_all(&self.inner).await?;
        Ok(rows.iter().map(row_to_map).collect())
    }

    async fn execute(&self, sql: &str, bindings: &[Value]) -> Result<Execution> {
        let sql = self.prepare(sql);
        let query = bind_values_to_query(sqlx::query(&sql), bindings);
        let result = query.execute(&self.inner).await?;
        Ok(Execution {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        })
    }
}

/// Bind values to an SQLx query
fn bind_values_to_query<'q>(
    mut query: SqlxQuery<'q, Any, AnyArguments<'q>>,
    bindings: &[Value],
) -> SqlxQuery<'q, Any, AnyArguments<'q>> {
    for value in bindings {
        query = match value {
            Value::Null => query.bind(None::<i64>),
            Value::Bool(b) => query.bind(*b),
            Value::I32(i) => query.bind(*i),
            Value::I64(i) => query.bind(*i),
            Value::F32(f) => query.bind(*f),
            Value::F64(f) => query.bind(*f),
            Value::String(s) => query.bind(s.clone()),
            Value::Bytes(b) => query.bind(b.clone()),
            Value::Json(j) => query.bind(j.to_string()),
            // Inlined by the grammar
            Value::Raw(_) => continue,
        };
    }
    query
}

/// Decode a row into JSON, trying the types the Any driver supports
fn row_to_map(row: &AnyRow) -> Row {
    let mut map = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        let value = if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
            v.map(serde_json::Value::from)
        } else if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
            v.map(serde_json::Value::from)
        } else if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
            v.map(serde_json::Value::from)
        } else if let Ok(v) = row.try_get::<Option<String>, _>(index) {
            v.map(serde_json::Value::from)
        } else if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(index) {
            v.map(serde_json::Value::from)
        } else {
            None
        };

        map.insert(
            column.name().to_string(),
            value.unwrap_or(serde_json::Value::Null),
        );
    }
    map
}

/// Rewrite `?` placeholders as `$1, $2, ...`, leaving quoted text alone
fn number_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut quote: Option<char> = None;
    let mut index = 0;

    for ch in sql.chars() {
        match (quote, ch) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '?') => {
                index += 1;
                out.push_str(&format!("${index}"));
                continue;
            }
            (None, _) => {}
        }
        out.push(ch);
    }
    out
}
