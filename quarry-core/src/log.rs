//! Query log sinks

use std::sync::Mutex;
use std::time::Duration;

use crate::Value;

/// One executed statement
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRecord {
    pub sql: String,
    pub bindings: Vec<Value>,
    pub elapsed: Duration,
}

/// Receives a record for every statement a [`Database`](crate::Database) runs
pub trait QueryLog: Send + Sync {
    fn record(&self, record: QueryRecord);
}

/// Forwards records to `tracing` under the `quarry.sql` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl QueryLog for TracingLog {
    fn record(&self, record: QueryRecord) {
        tracing::info!(
            target: "quarry.sql",
            sql = %record.sql,
            params = record.bindings.len(),
            elapsed_ms = record.elapsed.as_secs_f64() * 1000.0,
            "query"
        );
    }
}

/// Keeps records in memory, oldest first
#[derive(Debug, Default)]
pub struct MemoryLog {
    records: Mutex<Vec<QueryRecord>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn entries(&self) -> Vec<QueryRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl QueryLog for MemoryLog {
    fn record(&self, record: QueryRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sql: &str) -> QueryRecord {
        QueryRecord {
            sql: sql.to_string(),
            bindings: vec![Value::I32(1)],
            elapsed: Duration::from_millis(3),
        }
    }

    #[test]
    fn test_memory_log_keeps_order() {
        let log = MemoryLog::new();
        log.record(record("SELECT 1"));
        log.record(record("SELECT 2"));

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].sql, "SELECT 1");

        log.clear();
        assert!(log.entries().is_empty());
    }

    #[test]
    fn test_tracing_log_accepts_records() {
        TracingLog.record(record("SELECT 1"));
    }
}
