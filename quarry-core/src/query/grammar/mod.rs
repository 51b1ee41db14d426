//! Query grammars
//!
//! [`QueryGrammar`] carries the ANSI rendering as default methods; each
//! dialect overrides only what it does differently.

mod mysql;
mod postgres;
mod sqlite;
mod sqlserver;

pub use mysql::MySqlGrammar;
pub use postgres::PostgresGrammar;
pub use sqlite::SqliteGrammar;
pub use sqlserver::SqlServerGrammar;

use crate::config::Driver;
use crate::grammar::Grammar;
use crate::query::{
    Aggregate, HavingCondition, InsertValues, JoinType, Query, Selection, Where, WhereConnector,
};
use crate::{Error, Result, Value};

/// Rendered clauses of a SELECT in their fixed order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Components {
    pub select: String,
    pub from: String,
    pub joins: String,
    pub wheres: String,
    pub groups: String,
    pub havings: String,
    pub orders: String,
    pub limit: String,
    pub offset: String,
}

impl Components {
    /// Join the non-empty clauses with single spaces
    pub fn concatenate(&self) -> String {
        [
            &self.select,
            &self.from,
            &self.joins,
            &self.wheres,
            &self.groups,
            &self.havings,
            &self.orders,
            &self.limit,
            &self.offset,
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Compiles a [`Query`] into SQL for one dialect
pub trait QueryGrammar: Grammar + Send + Sync {
    fn compile_select(&self, query: &Query) -> Result<String> {
        Ok(self.components(query)?.concatenate())
    }

    fn components(&self, query: &Query) -> Result<Components> {
        Ok(Components {
            select: match &query.aggregate {
                Some(aggregate) => self.compile_aggregate(query, aggregate),
                None => self.compile_selects(query),
            },
            from: self.compile_from(query),
            joins: self.compile_joins(query),
            wheres: self.compile_wheres(query)?,
            groups: self.compile_groupings(query),
            havings: self.compile_havings(query),
            orders: self.compile_orderings(query),
            limit: self.compile_limit(query),
            offset: self.compile_offset(query),
        })
    }

    fn compile_aggregate(&self, query: &Query, aggregate: &Aggregate) -> String {
        let mut columns = self.columnize(&aggregate.columns);
        if query.distinct && columns != "*" {
            columns = format!("DISTINCT {columns}");
        }
        format!(
            "SELECT {}({}) AS {}",
            aggregate.function,
            columns,
            self.wrap("aggregate")
        )
    }

    fn compile_selects(&self, query: &Query) -> String {
        let select = if query.distinct {
            "SELECT DISTINCT "
        } else {
            "SELECT "
        };
        format!("{}{}", select, self.select_list(query))
    }

    /// Comma-joined select list, `*` when nothing was selected
    fn select_list(&self, query: &Query) -> String {
        match &query.selects {
            Some(selects) if !selects.is_empty() => selects
                .iter()
                .map(|selection| match selection {
                    Selection::Column(column) => self.wrap(column),
                    Selection::Raw(expression) => expression.clone(),
                })
                .collect::<Vec<_>>()
                .join(", "),
            _ => "*".to_string(),
        }
    }

    fn compile_from(&self, query: &Query) -> String {
        format!("FROM {}", self.wrap_table(&query.table))
    }

    fn compile_joins(&self, query: &Query) -> String {
        query
            .joins
            .iter()
            .map(|join| {
                let table = self.wrap_table(&join.table);
                if join.join_type == JoinType::Cross || join.on_conditions.is_empty() {
                    return format!("{} JOIN {}", join.join_type, table);
                }

                let conditions = join
                    .on_conditions
                    .iter()
                    .enumerate()
                    .map(|(i, condition)| {
                        let sql = format!(
                            "{} {} {}",
                            self.wrap(&condition.left_column),
                            condition.operator,
                            self.wrap(&condition.right_column)
                        );
                        connect(i, condition.connector, sql)
                    })
                    .collect::<Vec<_>>()
                    .join(" ");

                format!("{} JOIN {} ON {}", join.join_type, table, conditions)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn compile_wheres(&self, query: &Query) -> Result<String> {
        if query.wheres.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("WHERE {}", self.compile_predicates(&query.wheres)?))
    }

    /// Predicates joined by their connectors, the first connector dropped
    fn compile_predicates(&self, wheres: &[Where]) -> Result<String> {
        let mut parts = Vec::with_capacity(wheres.len());
        for (i, predicate) in wheres.iter().enumerate() {
            let sql = self.compile_where(predicate)?;
            parts.push(connect(i, predicate.connector(), sql));
        }
        Ok(parts.join(" "))
    }

    fn compile_where(&self, predicate: &Where) -> Result<String> {
        let sql = match predicate {
            Where::Basic {
                column,
                operator,
                value,
                ..
            } => format!("{} {} {}", self.wrap(column), operator, self.parameter(value)),
            Where::In { values, .. } if values.is_empty() => "0 = 1".to_string(),
            Where::In { column, values, .. } => {
                format!("{} IN ({})", self.wrap(column), self.parameterize(values))
            }
            Where::NotIn { values, .. } if values.is_empty() => "1 = 1".to_string(),
            Where::NotIn { column, values, .. } => {
                format!("{} NOT IN ({})", self.wrap(column), self.parameterize(values))
            }
            Where::Between {
                column, low, high, ..
            } => format!(
                "{} BETWEEN {} AND {}",
                self.wrap(column),
                self.parameter(low),
                self.parameter(high)
            ),
            Where::NotBetween {
                column, low, high, ..
            } => format!(
                "{} NOT BETWEEN {} AND {}",
                self.wrap(column),
                self.parameter(low),
                self.parameter(high)
            ),
            Where::Null { column, .. } => format!("{} IS NULL", self.wrap(column)),
            Where::NotNull { column, .. } => format!("{} IS NOT NULL", self.wrap(column)),
            Where::Raw { sql, .. } => sql.clone(),
            Where::Nested { wheres, .. } => format!("({})", self.compile_predicates(wheres)?),
            Where::InQuery { column, query, .. } => {
                format!("{} IN ({})", self.wrap(column), self.compile_select(query)?)
            }
            Where::NotInQuery { column, query, .. } => {
                format!("{} NOT IN ({})", self.wrap(column), self.compile_select(query)?)
            }
            Where::Exists { query, .. } => format!("EXISTS ({})", self.compile_select(query)?),
            Where::NotExists { query, .. } => {
                format!("NOT EXISTS ({})", self.compile_select(query)?)
            }
        };
        Ok(sql)
    }

    fn compile_groupings(&self, query: &Query) -> String {
        if query.groupings.is_empty() {
            return String::new();
        }
        format!("GROUP BY {}", self.columnize(&query.groupings))
    }

    fn compile_havings(&self, query: &Query) -> String {
        if query.havings.is_empty() {
            return String::new();
        }

        let conditions = query
            .havings
            .iter()
            .enumerate()
            .map(|(i, having)| connect(i, having.connector, self.compile_having(having)))
            .collect::<Vec<_>>()
            .join(" ");
        format!("HAVING {conditions}")
    }

    fn compile_having(&self, having: &HavingCondition) -> String {
        format!(
            "{} {} {}",
            self.wrap(&having.column),
            having.operator,
            self.parameter(&having.value)
        )
    }

    fn compile_orderings(&self, query: &Query) -> String {
        if query.orderings.is_empty() {
            return String::new();
        }
        format!("ORDER BY {}", self.order_list(query))
    }

    /// `col ASC, col2 DESC` without the `ORDER BY` keyword
    fn order_list(&self, query: &Query) -> String {
        query
            .orderings
            .iter()
            .map(|order| format!("{} {}", self.wrap(&order.column), order.direction))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn compile_limit(&self, query: &Query) -> String {
        match query.limit {
            Some(limit) if limit > 0 => format!("LIMIT {limit}"),
            _ => String::new(),
        }
    }

    fn compile_offset(&self, query: &Query) -> String {
        match query.offset {
            Some(offset) if offset > 0 => format!("OFFSET {offset}"),
            _ => String::new(),
        }
    }

    fn compile_insert(&self, query: &Query, values: &InsertValues) -> Result<String> {
        if values.columns.is_empty() || values.rows.is_empty() {
            return Err(Error::invalid_query("INSERT requires at least one value"));
        }

        let rows = values
            .rows
            .iter()
            .map(|row| format!("({})", self.parameterize(row)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.wrap_table(&query.table),
            self.columnize(&values.columns),
            rows
        ))
    }

    /// INSERT that reports the generated key; plain INSERT unless the dialect
    /// can return it from the statement itself
    fn compile_insert_get_id(
        &self,
        query: &Query,
        values: &InsertValues,
        _column: &str,
    ) -> Result<String> {
        self.compile_insert(query, values)
    }

    /// Whether `compile_insert_get_id` returns the key as a result row
    fn returns_inserted_id(&self) -> bool {
        false
    }

    fn compile_update(&self, query: &Query, values: &[(String, Value)]) -> Result<String> {
        if values.is_empty() {
            return Err(Error::invalid_query("UPDATE requires at least one column"));
        }

        let sets = values
            .iter()
            .map(|(column, value)| format!("{} = {}", self.wrap(column), self.parameter(value)))
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!("UPDATE {} SET {}", self.wrap_table(&query.table), sets);
        Ok(append(sql, self.compile_wheres(query)?))
    }

    fn compile_delete(&self, query: &Query) -> Result<String> {
        let sql = format!("DELETE FROM {}", self.wrap_table(&query.table));
        Ok(append(sql, self.compile_wheres(query)?))
    }

    /// Helper column added to result rows by offset emulation, if any
    fn row_number_column(&self) -> Option<&'static str> {
        None
    }
}

/// Prefix a clause with its connector unless it comes first
fn connect(index: usize, connector: WhereConnector, sql: String) -> String {
    if index == 0 {
        sql
    } else {
        format!("{connector} {sql}")
    }
}

fn append(sql: String, clause: String) -> String {
    if clause.is_empty() {
        sql
    } else {
        format!("{sql} {clause}")
    }
}

/// Grammar for drivers without a dedicated dialect
#[derive(Debug, Clone, Default)]
pub struct AnsiGrammar {
    prefix: String,
}

impl AnsiGrammar {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Grammar for AnsiGrammar {
    fn quotes(&self) -> (char, char) {
        ('"', '"')
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn dialect(&self) -> &'static str {
        "ansi"
    }
}

impl QueryGrammar for AnsiGrammar {}

/// Query grammar for a driver name, falling back to [`AnsiGrammar`]
pub fn for_driver(driver: &str, prefix: &str) -> Box<dyn QueryGrammar> {
    match driver.parse::<Driver>() {
        Ok(Driver::MySql) => Box::new(MySqlGrammar::new(prefix)),
        Ok(Driver::Sqlite) => Box::new(SqliteGrammar::new(prefix)),
        Ok(Driver::Postgres) => Box::new(PostgresGrammar::new(prefix)),
        Ok(Driver::SqlServer) => Box::new(SqlServerGrammar::new(prefix)),
        Err(_) => Box::new(AnsiGrammar::new(prefix)),
    }
}
