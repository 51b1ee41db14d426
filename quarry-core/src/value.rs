//! Value types for SQL parameters

use serde::{Deserialize, Serialize};

/// A SQL value that can be used as a parameter
///
/// `Raw` is the one exception: grammars inline its text where a placeholder
/// would otherwise go, and it never appears in a query's binding list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 32-bit integer
    I32(i32),
    /// 64-bit integer
    I64(i64),
    /// 32-bit float
    F32(f32),
    /// 64-bit float
    F64(f64),
    /// String value
    String(String),
    /// Bytes value
    Bytes(Vec<u8>),
    /// JSON value
    Json(serde_json::Value),
    /// SQL text emitted verbatim in place of a placeholder
    Raw(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Value::Raw(_))
    }

    /// The verbatim SQL of a `Raw` value
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Value::Raw(sql) => Some(sql),
            _ => None,
        }
    }

    /// Convert to a JSON value, as used for result rows and logging
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::I32(n) => Json::from(*n),
            Value::I64(n) => Json::from(*n),
            Value::F32(n) => Json::from(*n as f64),
            Value::F64(n) => Json::from(*n),
            Value::String(s) | Value::Raw(s) => Json::String(s.clone()),
            Value::Bytes(bytes) => Json::from(bytes.clone()),
            Value::Json(json) => json.clone(),
        }
    }
}

/// Mark a SQL fragment to be inlined where a value would be bound.
///
/// # Examples
/// ```
/// use quarry_core::{raw, Value};
///
/// assert_eq!(raw("NOW()"), Value::Raw("NOW()".to_string()));
/// ```
pub fn raw(sql: impl Into<String>) -> Value {
    Value::Raw(sql.into())
}

// Implement From for common types
impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}

impl From<i32> for Value {
    fn from(val: i32) -> Self {
        Value::I32(val)
    }
}

impl From<u32> for Value {
    fn from(val: u32) -> Self {
        Value::I64(val.into())
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Self {
        Value::I64(val)
    }
}

impl From<f32> for Value {
    fn from(val: f32) -> Self {
        Value::F32(val)
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::F64(val)
    }
}

impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::String(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::String(val.to_string())
    }
}

impl From<&String> for Value {
    fn from(val: &String) -> Self {
        Value::String(val.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(val: Vec<u8>) -> Self {
        Value::Bytes(val)
    }
}

impl From<serde_json::Value> for Value {
    fn from(val: serde_json::Value) -> Self {
        Value::Json(val)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

#[cfg(feature = "uuid-support")]
impl From<uuid::Uuid> for Value {
    fn from(val: uuid::Uuid) -> Self {
        Value::String(val.to_string())
    }
}

#[cfg(feature = "datetime-support")]
impl From<chrono::NaiveDate> for Value {
    fn from(val: chrono::NaiveDate) -> Self {
        Value::String(val.format("%Y-%m-%d").to_string())
    }
}

#[cfg(feature = "datetime-support")]
impl From<chrono::NaiveDateTime> for Value {
    fn from(val: chrono::NaiveDateTime) -> Self {
        Value::String(val.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

#[cfg(feature = "datetime-support")]
impl From<chrono::DateTime<chrono::Utc>> for Value {
    fn from(val: chrono::DateTime<chrono::Utc>) -> Self {
        Value::String(val.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

#[cfg(feature = "decimal-support")]
impl From<rust_decimal::Decimal> for Value {
    fn from(val: rust_decimal::Decimal) -> Self {
        Value::String(val.to_string())
    }
}
