//! Identifier wrapping and placeholder helpers shared by query and schema grammars

use crate::Value;

/// Behaviour every dialect grammar shares: quoting identifiers, applying the
/// table prefix and turning values into placeholders.
pub trait Grammar {
    /// Opening and closing identifier quote characters
    fn quotes(&self) -> (char, char);

    /// Table prefix from the connection configuration
    fn prefix(&self) -> &str;

    /// Driver name used in error messages
    fn dialect(&self) -> &'static str;

    /// Wrap a table name, applying the configured prefix.
    ///
    /// Already quoted names are returned untouched so wrapping twice is a no-op.
    fn wrap_table(&self, table: &str) -> String {
        if let Some((name, alias)) = split_alias(table) {
            return format!("{} AS {}", self.wrap_table(name), self.wrap_value(alias));
        }

        if self.is_wrapped(table) {
            return table.to_string();
        }

        match table.rsplit_once('.') {
            Some((schema, name)) => format!(
                "{}.{}",
                self.wrap(schema),
                self.wrap_table(name)
            ),
            None => self.wrap_value(&format!("{}{}", self.prefix(), table)),
        }
    }

    /// Wrap a possibly qualified column reference such as `users.id as uid`
    fn wrap(&self, value: &str) -> String {
        if let Some((name, alias)) = split_alias(value) {
            return format!("{} AS {}", self.wrap(name), self.wrap_value(alias));
        }

        let segments: Vec<&str> = value.split('.').collect();
        let last = segments.len() - 1;

        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                if i == 0 && last > 0 {
                    self.wrap_table(segment)
                } else {
                    self.wrap_value(segment)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quote a single identifier segment
    fn wrap_value(&self, value: &str) -> String {
        if value == "*" || self.is_wrapped(value) {
            return value.to_string();
        }

        let (open, close) = self.quotes();
        let escaped = value.replace(close, &format!("{close}{close}"));
        format!("{open}{escaped}{close}")
    }

    /// Whether a segment is already quoted for this dialect
    fn is_wrapped(&self, value: &str) -> bool {
        let (open, close) = self.quotes();
        value.len() >= 2 && value.starts_with(open) && value.ends_with(close)
    }

    /// Wrap and comma-join a list of columns
    fn columnize(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|column| self.wrap(column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Placeholder for a single value; raw values are inlined
    fn parameter(&self, value: &Value) -> String {
        match value {
            Value::Raw(sql) => sql.clone(),
            _ => "?".to_string(),
        }
    }

    /// Comma-joined placeholders for a list of values
    fn parameterize(&self, values: &[Value]) -> String {
        values
            .iter()
            .map(|value| self.parameter(value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Split `name as alias` on the first case-insensitive ` as `
pub(crate) fn split_alias(value: &str) -> Option<(&str, &str)> {
    let position = value
        .as_bytes()
        .windows(4)
        .position(|window| window.eq_ignore_ascii_case(b" as "))?;

    Some((value[..position].trim(), value[position + 4..].trim()))
}
