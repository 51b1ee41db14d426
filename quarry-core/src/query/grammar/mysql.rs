use super::QueryGrammar;
use crate::grammar::Grammar;
use crate::query::Query;

/// Largest row count MySQL accepts in a LIMIT clause
const MAX_ROWS: u64 = u64::MAX;

#[derive(Debug, Clone, Default)]
pub struct MySqlGrammar {
    prefix: String,
}

impl MySqlGrammar {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Grammar for MySqlGrammar {
    fn quotes(&self) -> (char, char) {
        ('`', '`')
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn dialect(&self) -> &'static str {
        "mysql"
    }
}

impl QueryGrammar for MySqlGrammar {
    /// MySQL has no OFFSET without LIMIT, so an offset alone gets the maximal limit
    fn compile_limit(&self, query: &Query) -> String {
        match (query.limit, query.offset) {
            (Some(limit), _) if limit > 0 => format!("LIMIT {limit}"),
            (_, Some(offset)) if offset > 0 => format!("LIMIT {MAX_ROWS}"),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{op, table, Value};

    #[test]
    fn test_backtick_quoting() {
        let grammar = MySqlGrammar::default();
        let query = table("users")
            .where_(("age", op::GT, 18))
            .order_by("name", "asc")
            .take(10);

        assert_eq!(
            grammar.compile_select(&query).unwrap(),
            "SELECT * FROM `users` WHERE `age` > ? ORDER BY `name` ASC LIMIT 10"
        );
        assert_eq!(query.bindings(), vec![Value::I32(18)]);
    }

    #[test]
    fn test_backticks_in_identifiers_are_doubled() {
        let grammar = MySqlGrammar::default();
        assert_eq!(grammar.wrap("odd`name"), "`odd``name`");
    }

    #[test]
    fn test_offset_without_limit() {
        let grammar = MySqlGrammar::default();
        let query = table("users").skip(5);
        assert_eq!(
            grammar.compile_select(&query).unwrap(),
            "SELECT * FROM `users` LIMIT 18446744073709551615 OFFSET 5"
        );
    }
}
