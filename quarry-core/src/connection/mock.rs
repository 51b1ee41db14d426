//! Recording connection used by the unit tests

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{Connection, Execution, Row};
use crate::{Error, Result, Value};

/// Records every statement and replays canned result sets.
///
/// Result sets queued with `with_rows` are returned in order; the last one
/// keeps being returned once the queue is down to it.
#[derive(Default)]
pub(crate) struct MockConnection {
    should_fail: bool,
    fail_on: Option<usize>,
    results: Mutex<VecDeque<Vec<Row>>>,
    last_insert_id: Option<i64>,
    executed: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockConnection {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Fail the statement at `index` (0-based) and succeed otherwise
    pub(crate) fn failing_at(index: usize) -> Self {
        Self {
            fail_on: Some(index),
            ..Self::default()
        }
    }

    pub(crate) fn with_rows(self, rows: Vec<serde_json::Value>) -> Self {
        let rows = rows
            .into_iter()
            .filter_map(|row| match row {
                serde_json::Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        if let Ok(mut results) = self.results.lock() {
            results.push_back(rows);
        }
        self
    }

    pub(crate) fn with_last_insert_id(mut self, id: i64) -> Self {
        self.last_insert_id = Some(id);
        self
    }

    pub(crate) fn executed(&self) -> Vec<(String, Vec<Value>)> {
        self.executed.lock().unwrap().clone()
    }

    pub(crate) fn statements(&self) -> Vec<String> {
        self.executed().into_iter().map(|(sql, _)| sql).collect()
    }

    fn record(&self, sql: &str, bindings: &[Value]) -> Result<()> {
        let mut executed = self.executed.lock().unwrap();
        let index = executed.len();
        executed.push((sql.to_string(), bindings.to_vec()));

        if self.should_fail || self.fail_on == Some(index) {
            return Err(Error::sql_generation("Mock execute failure"));
        }
        Ok(())
    }
}

impl Connection for MockConnection {
    async fn select(&self, sql: &str, bindings: &[Value]) -> Result<Vec<Row>> {
        self.record(sql, bindings)?;

        let mut results = self.results.lock().unwrap();
        let rows = if results.len() > 1 {
            results.pop_front()
        } else {
            results.front().cloned()
        };
        Ok(rows.unwrap_or_default())
    }

    async fn execute(&self, sql: &str, bindings: &[Value]) -> Result<Execution> {
        self.record(sql, bindings)?;

        Ok(Execution {
            rows_affected: 1,
            last_insert_id: self.last_insert_id,
        })
    }
}
