use super::QueryGrammar;
use crate::grammar::Grammar;
use crate::query::Query;
use crate::{Error, Result};

/// Column holding the emulated row number when paging with an offset
const ROW_NUMBER: &str = "RowNum";

#[derive(Debug, Clone, Default)]
pub struct SqlServerGrammar {
    prefix: String,
}

impl SqlServerGrammar {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// SQL Server has no LIMIT/OFFSET; offsets are emulated with ROW_NUMBER()
    fn emulates_offset(query: &Query) -> bool {
        query.aggregate.is_none() && query.offset.unwrap_or(0) > 0
    }

    /// ORDER BY for the ROW_NUMBER() window; columns lose their table
    /// qualifier when numbering the rows of a derived table
    fn over(&self, query: &Query, qualified: bool) -> String {
        if query.orderings.is_empty() {
            return "ORDER BY (SELECT 0)".to_string();
        }
        if qualified {
            return format!("ORDER BY {}", self.order_list(query));
        }

        let orders = query
            .orderings
            .iter()
            .map(|order| {
                let column = order.column.rsplit('.').next().unwrap_or(&order.column);
                format!("{} {}", self.wrap(column), order.direction)
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("ORDER BY {orders}")
    }

    /// Inclusive row number window for the current offset and limit
    fn window(query: &Query) -> Result<String> {
        let offset = query.offset.unwrap_or(0);
        let start = offset
            .checked_add(1)
            .ok_or_else(|| Error::invalid_query(format!("offset {offset} is out of range")))?;

        match query.limit {
            Some(limit) if limit > 0 => {
                let end = start.checked_add(limit - 1).ok_or_else(|| {
                    Error::invalid_query(format!(
                        "offset {offset} with limit {limit} is out of range"
                    ))
                })?;
                Ok(format!("BETWEEN {start} AND {end}"))
            }
            _ => Ok(format!(">= {start}")),
        }
    }

    /// Wrap the inner select and filter on the row number window
    fn nest(&self, sql: String, query: &Query) -> Result<String> {
        let filter = Self::window(query)?;

        // DISTINCT has to apply before rows are numbered
        let numbered = if query.distinct {
            format!(
                "SELECT *, ROW_NUMBER() OVER ({}) AS {} FROM ({}) AS {}",
                self.over(query, false),
                self.wrap(ROW_NUMBER),
                sql,
                self.wrap("TempDistinct")
            )
        } else {
            sql
        };

        Ok(format!(
            "SELECT * FROM ({}) AS {} WHERE {} {} ORDER BY {}",
            numbered,
            self.wrap("TempTable"),
            self.wrap(ROW_NUMBER),
            filter,
            self.wrap(ROW_NUMBER)
        ))
    }
}

impl Grammar for SqlServerGrammar {
    fn quotes(&self) -> (char, char) {
        ('[', ']')
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn dialect(&self) -> &'static str {
        "sqlsrv"
    }
}

impl QueryGrammar for SqlServerGrammar {
    fn compile_select(&self, query: &Query) -> Result<String> {
        let mut components = self.components(query)?;
        if !Self::emulates_offset(query) {
            return Ok(components.concatenate());
        }

        components.orders.clear();
        components.limit.clear();
        components.offset.clear();
        self.nest(components.concatenate(), query)
    }

    fn compile_selects(&self, query: &Query) -> String {
        let mut select = String::from("SELECT ");
        if query.distinct {
            select.push_str("DISTINCT ");
        }

        if Self::emulates_offset(query) {
            if query.distinct {
                return format!("{}{}", select, self.select_list(query));
            }
            return format!(
                "{}{}, ROW_NUMBER() OVER ({}) AS {}",
                select,
                self.select_list(query),
                self.over(query, true),
                self.wrap(ROW_NUMBER)
            );
        }

        if let Some(limit) = query.limit.filter(|limit| *limit > 0) {
            select.push_str(&format!("TOP {limit} "));
        }
        format!("{}{}", select, self.select_list(query))
    }

    /// Limits are rendered as TOP or a row number window
    fn compile_limit(&self, _query: &Query) -> String {
        String::new()
    }

    fn compile_offset(&self, _query: &Query) -> String {
        String::new()
    }

    fn row_number_column(&self) -> Option<&'static str> {
        Some(ROW_NUMBER)
    }
}
