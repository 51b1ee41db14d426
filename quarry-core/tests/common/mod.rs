use std::sync::Mutex;

use quarry_core::{Connection, Execution, Result, Row, Value};

/// Connection that records statements and answers selects with fixed rows
#[derive(Default)]
pub struct RecordingConnection {
    rows: Vec<Row>,
    pub statements: Mutex<Vec<(String, Vec<Value>)>>,
}

impl RecordingConnection {
    pub fn returning(rows: Vec<serde_json::Value>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .filter_map(|row| match row {
                    serde_json::Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn sql(&self) -> Vec<String> {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }

    pub fn bindings(&self) -> Vec<Vec<Value>> {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .map(|(_, bindings)| bindings.clone())
            .collect()
    }
}

impl Connection for RecordingConnection {
    async fn select(&self, sql: &str, bindings: &[Value]) -> Result<Vec<Row>> {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), bindings.to_vec()));
        Ok(self.rows.clone())
    }

    async fn execute(&self, sql: &str, bindings: &[Value]) -> Result<Execution> {
        self.statements
            .lock()
            .unwrap()
            .push((sql.to_string(), bindings.to_vec()));
        Ok(Execution {
            rows_affected: 1,
            last_insert_id: Some(7),
        })
    }
}
