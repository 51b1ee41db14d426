//! Quarry Core - a fluent SQL query and schema builder
//!
//! Queries and table blueprints are plain values compiled by a per-dialect
//! grammar (MySQL, SQLite, PostgreSQL, SQL Server) into SQL text plus an
//! ordered list of bindings, then run through a [`Connection`].
//!
//! ```
//! use quarry_core::query::grammar::{MySqlGrammar, QueryGrammar};
//! use quarry_core::{op, table, Value};
//!
//! let query = table("users")
//!     .where_(("age", op::GT, 18))
//!     .order_by("name", "asc")
//!     .take(10);
//!
//! let sql = MySqlGrammar::default().compile_select(&query).unwrap();
//! assert_eq!(sql, "SELECT * FROM `users` WHERE `age` > ? ORDER BY `name` ASC LIMIT 10");
//! assert_eq!(query.bindings(), vec![Value::from(18)]);
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod grammar;
pub mod log;
pub mod operator;
pub mod query;
pub mod schema;
pub mod value;

// Re-export main types
pub use config::{Config, Driver};
pub use connection::{Connection, Database, Execution, Row, SqlxConnection};
pub use error::{Error, Result};
pub use log::{MemoryLog, QueryLog, QueryRecord, TracingLog};
pub use operator::{op, IntoOperator, Operator};
pub use query::{
    AggregateFunction, IntoInsertData, IntoRow, JoinType, Paginator, Query, SortDirection,
    WhereConnector,
};
pub use schema::{Column, ColumnType, Command, Schema, SchemaGrammar, Table};
pub use value::{raw, Value};

/// Start a query against the given table
pub fn table(name: &str) -> Query {
    Query::new(name)
}
