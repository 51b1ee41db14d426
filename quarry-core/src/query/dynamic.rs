//! Dynamic method names such as `where_email_and_status` or `count`

use super::{AggregateFunction, Query, WhereConnector};
use crate::connection::{Connection, Database};
use crate::{Error, Result, Value};

/// A parsed dynamic method name
#[derive(Debug, Clone, PartialEq)]
pub enum Method {
    /// `where_<a>_and_<b>_or_<c>`: one equality predicate per column
    Where(Vec<(WhereConnector, String)>),
    Aggregate(AggregateFunction),
}

impl Method {
    /// Parse a method name.
    ///
    /// ```
    /// use quarry_core::query::{Method, WhereConnector};
    ///
    /// let method = Method::parse("where_email_or_name").unwrap();
    /// assert_eq!(
    ///     method,
    ///     Method::Where(vec![
    ///         (WhereConnector::And, "email".to_string()),
    ///         (WhereConnector::Or, "name".to_string()),
    ///     ])
    /// );
    /// ```
    pub fn parse(name: &str) -> Result<Self> {
        if let Some(function) = AggregateFunction::from_name(name) {
            return Ok(Method::Aggregate(function));
        }

        let finder = match name.get(..6) {
            Some(prefix) if prefix.eq_ignore_ascii_case("where_") => &name[6..],
            _ => return Err(Error::undefined_method(name)),
        };

        let columns = split_finder(finder);
        if columns.iter().any(|(_, column)| column.is_empty()) {
            return Err(Error::undefined_method(name));
        }
        Ok(Method::Where(columns))
    }
}

/// Split on `_and_` / `_or_` in any case, tagging each column with the
/// connector that precedes it.
fn split_finder(finder: &str) -> Vec<(WhereConnector, String)> {
    let lower = finder.to_ascii_lowercase();
    let mut columns = Vec::new();
    let mut connector = WhereConnector::And;
    let mut start = 0;
    let mut cursor = 0;

    while cursor < lower.len() {
        let rest = &lower[cursor..];
        let matched = if rest.starts_with("_and_") {
            Some((WhereConnector::And, 5))
        } else if rest.starts_with("_or_") {
            Some((WhereConnector::Or, 4))
        } else {
            None
        };

        match matched {
            Some((next, width)) => {
                columns.push((connector, finder[start..cursor].to_string()));
                connector = next;
                cursor += width;
                start = cursor;
            }
            None => cursor += rest.chars().next().map_or(1, char::len_utf8),
        }
    }
    columns.push((connector, finder[start..].to_string()));
    columns
}

impl Query {
    /// Apply a dynamic finder: `where_email_and_status` with two values adds
    /// `email = ? AND status = ?`.
    pub fn dynamic_where(mut self, method: &str, parameters: Vec<Value>) -> Result<Self> {
        let columns = match Method::parse(method)? {
            Method::Where(columns) => columns,
            Method::Aggregate(_) => return Err(Error::undefined_method(method)),
        };

        if columns.len() != parameters.len() {
            return Err(Error::invalid_query(format!(
                "{method} expects {} parameters, got {}",
                columns.len(),
                parameters.len()
            )));
        }

        for ((connector, column), value) in columns.into_iter().zip(parameters) {
            self.push_basic((column.as_str(), value), connector);
        }
        Ok(self)
    }

    /// Run an aggregate named at runtime (`count`, `min`, `max`, `avg`, `sum`)
    pub async fn call_aggregate<C>(
        &mut self,
        db: &Database<C>,
        method: &str,
        column: &str,
    ) -> Result<Option<serde_json::Value>>
    where
        C: Connection,
    {
        match Method::parse(method)? {
            Method::Aggregate(function) => self.aggregate(db, function, column).await,
            Method::Where(_) => Err(Error::undefined_method(method)),
        }
    }
}
