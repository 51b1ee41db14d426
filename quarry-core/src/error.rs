//! Error types for Quarry

use thiserror::Error;

/// The main error type for Quarry operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database connection or execution error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// SQL generation error
    #[error("SQL generation error: {message}")]
    SqlGeneration { message: String },

    /// Invalid query configuration
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A result row did not carry a requested column
    #[error("Column '{column}' not found in results from table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// A grammar was asked to compile something its dialect cannot express
    #[error("The {dialect} grammar does not support {operation}{hint}")]
    Unsupported {
        dialect: &'static str,
        operation: String,
        hint: String,
    },

    /// No schema grammar is registered for the configured driver
    #[error("Schema operations not supported for driver [{driver}]")]
    UnsupportedDriver { driver: String },

    /// Dynamic call that is neither a clause builder nor an aggregate
    #[error("Method [{method}] is not defined on the query builder")]
    UndefinedMethod { method: String },
}

/// Convenience Result type for Quarry operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new SQL generation error
    pub fn sql_generation(message: impl Into<String>) -> Self {
        Self::SqlGeneration {
            message: message.into(),
        }
    }

    /// Create a new invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create a new column not found error
    pub fn column_not_found(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create a new unsupported operation error
    pub fn unsupported(dialect: &'static str, operation: impl Into<String>) -> Self {
        Self::Unsupported {
            dialect,
            operation: operation.into(),
            hint: String::new(),
        }
    }

    /// Create an unsupported operation error with advice for the caller
    pub fn unsupported_with_hint(
        dialect: &'static str,
        operation: impl Into<String>,
        hint: impl AsRef<str>,
    ) -> Self {
        Self::Unsupported {
            dialect,
            operation: operation.into(),
            hint: format!("; {}", hint.as_ref()),
        }
    }

    /// Create a new unsupported driver error
    pub fn unsupported_driver(driver: impl Into<String>) -> Self {
        Self::UnsupportedDriver {
            driver: driver.into(),
        }
    }

    /// Create a new undefined method error
    pub fn undefined_method(method: impl Into<String>) -> Self {
        Self::UndefinedMethod {
            method: method.into(),
        }
    }
}
