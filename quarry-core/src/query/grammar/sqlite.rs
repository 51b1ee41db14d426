use super::QueryGrammar;
use crate::grammar::Grammar;
use crate::query::{InsertValues, Query};
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct SqliteGrammar {
    prefix: String,
}

impl SqliteGrammar {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Grammar for SqliteGrammar {
    fn quotes(&self) -> (char, char) {
        ('"', '"')
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn dialect(&self) -> &'static str {
        "sqlite"
    }
}

impl QueryGrammar for SqliteGrammar {
    /// `LIMIT -1` lifts the row cap so a bare OFFSET is accepted
    fn compile_limit(&self, query: &Query) -> String {
        match (query.limit, query.offset) {
            (Some(limit), _) if limit > 0 => format!("LIMIT {limit}"),
            (_, Some(offset)) if offset > 0 => "LIMIT -1".to_string(),
            _ => String::new(),
        }
    }

    /// Multi-row inserts are written as a `UNION ALL` of single-row selects
    fn compile_insert(&self, query: &Query, values: &InsertValues) -> Result<String> {
        if values.rows.len() < 2 {
            return self.compile_single_insert(query, values);
        }

        let selects = values
            .rows
            .iter()
            .map(|row| {
                let columns = row
                    .iter()
                    .zip(&values.columns)
                    .map(|(value, column)| {
                        format!("{} AS {}", self.parameter(value), self.wrap(column))
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("SELECT {columns}")
            })
            .collect::<Vec<_>>()
            .join(" UNION ALL ");

        Ok(format!(
            "INSERT INTO {} ({}) {}",
            self.wrap_table(&query.table),
            self.columnize(&values.columns),
            selects
        ))
    }
}

impl SqliteGrammar {
    fn compile_single_insert(&self, query: &Query, values: &InsertValues) -> Result<String> {
        let row = values
            .rows
            .first()
            .filter(|_| !values.columns.is_empty())
            .ok_or_else(|| Error::invalid_query("INSERT requires at least one value"))?;

        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.wrap_table(&query.table),
            self.columnize(&values.columns),
            self.parameterize(row)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{table, Value};

    #[test]
    fn test_offset_without_limit() {
        let grammar = SqliteGrammar::default();
        assert_eq!(
            grammar.compile_select(&table("users").skip(10)).unwrap(),
            "SELECT * FROM \"users\" LIMIT -1 OFFSET 10"
        );
    }

    #[test]
    fn test_multi_row_insert_uses_union_all() {
        let grammar = SqliteGrammar::default();
        let values = InsertValues {
            columns: vec!["name".into(), "age".into()],
            rows: vec![
                vec![Value::from("a"), Value::I32(1)],
                vec![Value::from("b"), Value::I32(2)],
            ],
        };

        assert_eq!(
            grammar.compile_insert(&table("users"), &values).unwrap(),
            "INSERT INTO \"users\" (\"name\", \"age\") \
             SELECT ? AS \"name\", ? AS \"age\" UNION ALL SELECT ? AS \"name\", ? AS \"age\""
        );
        assert_eq!(values.bindings().len(), 4);
    }

    #[test]
    fn test_single_row_insert() {
        let grammar = SqliteGrammar::default();
        let values = InsertValues {
            columns: vec!["name".into()],
            rows: vec![vec![Value::from("a")]],
        };
        assert_eq!(
            grammar.compile_insert(&table("users"), &values).unwrap(),
            "INSERT INTO \"users\" (\"name\") VALUES (?)"
        );
    }
}
