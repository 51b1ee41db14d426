//! Connection boundary and the `Database` handle that ties a connection to
//! its grammars and query log

#[cfg(test)]
pub(crate) mod mock;
mod any;

pub use self::any::SqlxConnection;

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::log::{QueryLog, QueryRecord};
use crate::query::{self, Query, QueryGrammar};
use crate::schema::{self, Schema, SchemaGrammar};
use crate::{Result, Value};

/// A result row keyed by column name
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Outcome of a statement that returns no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Execution {
    pub rows_affected: u64,
    pub last_insert_id: Option<i64>,
}

/// Trait for anything that can run compiled SQL with positional bindings
pub trait Connection: Send + Sync {
    /// Execute a query that returns rows
    fn select(
        &self,
        sql: &str,
        bindings: &[Value],
    ) -> impl Future<Output = Result<Vec<Row>>> + Send;

    /// Execute a statement that returns no rows (INSERT, UPDATE, DELETE, DDL)
    fn execute(
        &self,
        sql: &str,
        bindings: &[Value],
    ) -> impl Future<Output = Result<Execution>> + Send;
}

/// A connection together with the grammar for its driver
pub struct Database<C> {
    connection: C,
    config: Config,
    grammar: Box<dyn QueryGrammar>,
    log: Option<Arc<dyn QueryLog>>,
}

impl<C> Database<C>
where
    C: Connection,
{
    pub fn new(connection: C, config: Config) -> Self {
        let grammar = query::grammar::for_driver(&config.driver, &config.prefix);
        Self {
            connection,
            config,
            grammar,
            log: None,
        }
    }

    /// Send a record of every statement to `log`
    pub fn with_log(mut self, log: Arc<dyn QueryLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Start a query against a table
    pub fn table(&self, name: &str) -> Query {
        Query::new(name)
    }

    /// Schema builder bound to this database
    pub fn schema(&self) -> Schema<'_, C> {
        Schema::new(self)
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn grammar(&self) -> &dyn QueryGrammar {
        self.grammar.as_ref()
    }

    /// Schema grammar for the configured driver
    pub fn schema_grammar(&self) -> Result<Box<dyn SchemaGrammar>> {
        schema::grammar::for_driver(&self.config.driver, &self.config.prefix)
    }

    /// Run a query and return its rows
    pub async fn select(&self, sql: &str, bindings: &[Value]) -> Result<Vec<Row>> {
        let started = Instant::now();
        let result = self.connection.select(sql, bindings).await;
        self.finish(sql, bindings, started, result.is_ok());
        result
    }

    /// Run a statement and report affected rows
    pub async fn execute(&self, sql: &str, bindings: &[Value]) -> Result<Execution> {
        let started = Instant::now();
        let result = self.connection.execute(sql, bindings).await;
        self.finish(sql, bindings, started, result.is_ok());
        result
    }

    fn finish(&self, sql: &str, bindings: &[Value], started: Instant, ok: bool) {
        let elapsed = started.elapsed();
        tracing::debug!(
            target: "quarry.sql",
            sql,
            params = bindings.len(),
            elapsed_us = elapsed.as_micros() as u64,
            ok,
            "statement executed"
        );

        if let Some(log) = &self.log {
            log.record(QueryRecord {
                sql: sql.to_string(),
                bindings: bindings.to_vec(),
                elapsed,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockConnection;
    use super::*;
    use crate::grammar::Grammar;
    use crate::log::MemoryLog;

    #[tokio::test]
    async fn test_statements_are_logged() {
        let log = Arc::new(MemoryLog::new());
        let db = Database::new(MockConnection::new(), Config::new("sqlite")).with_log(log.clone());

        db.execute("DELETE FROM \"users\" WHERE \"id\" = ?", &[Value::I32(1)])
            .await
            .unwrap();

        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sql, "DELETE FROM \"users\" WHERE \"id\" = ?");
        assert_eq!(entries[0].bindings, vec![Value::I32(1)]);
    }

    #[tokio::test]
    async fn test_failed_statements_are_logged_too() {
        let log = Arc::new(MemoryLog::new());
        let db = Database::new(MockConnection::with_failure(), Config::new("mysql"))
            .with_log(log.clone());

        assert!(db.select("SELECT 1", &[]).await.is_err());
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn test_grammar_follows_driver() {
        let db = Database::new(MockConnection::new(), Config::new("sqlsrv").with_prefix("x_"));
        assert_eq!(db.grammar().dialect(), "sqlsrv");
        assert_eq!(db.grammar().wrap_table("users"), "[x_users]");

        let db = Database::new(MockConnection::new(), Config::new("oracle"));
        assert_eq!(db.grammar().dialect(), "ansi");
        assert!(db.schema_grammar().is_err());
    }

    #[test]
    fn test_table_starts_a_query() {
        let db = Database::new(MockConnection::new(), Config::new("mysql"));
        let query = db.table("users");
        assert_eq!(query.table, "users");
    }
}
