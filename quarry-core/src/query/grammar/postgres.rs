use super::QueryGrammar;
use crate::grammar::Grammar;
use crate::query::{InsertValues, Query};
use crate::Result;

#[derive(Debug, Clone, Default)]
pub struct PostgresGrammar {
    prefix: String,
}

impl PostgresGrammar {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Grammar for PostgresGrammar {
    fn quotes(&self) -> (char, char) {
        ('"', '"')
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn dialect(&self) -> &'static str {
        "pgsql"
    }
}

impl QueryGrammar for PostgresGrammar {
    fn compile_insert_get_id(
        &self,
        query: &Query,
        values: &InsertValues,
        column: &str,
    ) -> Result<String> {
        Ok(format!(
            "{} RETURNING {}",
            self.compile_insert(query, values)?,
            self.wrap(column)
        ))
    }

    fn returns_inserted_id(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::grammar::MySqlGrammar;
    use crate::{table, Value};

    fn values() -> InsertValues {
        InsertValues {
            columns: vec!["email".into()],
            rows: vec![vec![Value::from("a@example.com")]],
        }
    }

    #[test]
    fn test_insert_get_id_returns_key() {
        let grammar = PostgresGrammar::default();
        assert_eq!(
            grammar
                .compile_insert_get_id(&table("users"), &values(), "id")
                .unwrap(),
            "INSERT INTO \"users\" (\"email\") VALUES (?) RETURNING \"id\""
        );
        assert!(grammar.returns_inserted_id());
    }

    #[test]
    fn test_mysql_insert_get_id_has_no_returning() {
        let grammar = MySqlGrammar::default();
        let sql = grammar
            .compile_insert_get_id(&table("users"), &values(), "id")
            .unwrap();
        assert!(!sql.contains("RETURNING"));
        assert!(!grammar.returns_inserted_id());
    }
}
