//! Fluent query builder
//!
//! A [`Query`] accumulates selects, joins, predicates, grouping, ordering and
//! pagination for one table. Grammars in [`grammar`] turn it into dialect SQL,
//! and the terminal operations run it through a [`Database`].
//!
//! Bindings are tracked as clauses are added, so the binding list always lines
//! up with the placeholders the grammar emits.

pub mod clause;
pub mod dynamic;
pub mod grammar;

use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::connection::{Connection, Database, Row};
use crate::grammar::Grammar;
use crate::{Error, IntoOperator, Result, Value};

pub use clause::{
    Aggregate, AggregateFunction, HavingCondition, IntoColumns, IntoCondition, JoinClause,
    JoinCondition, JoinType, OrderByClause, Selection, SortDirection, Where, WhereConnector,
};
pub use dynamic::Method;
pub use grammar::{AnsiGrammar, QueryGrammar};

/// An in-memory SELECT/INSERT/UPDATE/DELETE under construction
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub table: String,
    pub distinct: bool,
    /// `None` selects every column
    pub selects: Option<Vec<Selection>>,
    pub aggregate: Option<Aggregate>,
    pub joins: Vec<JoinClause>,
    pub wheres: Vec<Where>,
    pub groupings: Vec<String>,
    pub havings: Vec<HavingCondition>,
    pub orderings: Vec<OrderByClause>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    where_bindings: Vec<Value>,
    having_bindings: Vec<Value>,
}

/// Column names and value rows of an INSERT, aligned by column
#[derive(Debug, Clone, PartialEq)]
pub struct InsertValues {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// One page of results plus the totals needed to render page links
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginator<T = Row> {
    pub results: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub last_page: u64,
}

impl Query {
    /// Create a new query builder for the given table
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    /// Bindings in placeholder order: predicate values, then HAVING values.
    ///
    /// Raw values are inlined by the grammar and never show up here.
    pub fn bindings(&self) -> Vec<Value> {
        self.where_bindings
            .iter()
            .chain(self.having_bindings.iter())
            .filter(|value| !value.is_raw())
            .cloned()
            .collect()
    }

    // ---------------------------------------------------------------------
    // Projection
    // ---------------------------------------------------------------------

    /// Replace the select list
    pub fn select<C>(mut self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        self.selects = Some(
            columns
                .into_columns()
                .into_iter()
                .map(Selection::Column)
                .collect(),
        );
        self
    }

    /// Append a verbatim expression to the select list
    pub fn select_raw(mut self, expression: &str) -> Self {
        self.selects
            .get_or_insert_with(Vec::new)
            .push(Selection::Raw(expression.to_string()));
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    // ---------------------------------------------------------------------
    // Predicates
    // ---------------------------------------------------------------------

    /// Add an AND-connected comparison: `("age", 18)` or `("age", ">", 18)`
    pub fn where_<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.push_basic(condition, WhereConnector::And);
        self
    }

    /// Add an OR-connected comparison
    pub fn or_where<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.push_basic(condition, WhereConnector::Or);
        self
    }

    /// Group the predicates built by `build` in parentheses.
    ///
    /// ```
    /// use quarry_core::table;
    ///
    /// let query = table("users")
    ///     .where_(("active", true))
    ///     .where_nested(|q| q.where_(("role", "admin")).or_where(("role", "owner")));
    /// assert_eq!(query.bindings().len(), 3);
    /// ```
    pub fn where_nested<F>(mut self, build: F) -> Self
    where
        F: FnOnce(Query) -> Query,
    {
        self.push_nested(build, WhereConnector::And);
        self
    }

    pub fn or_where_nested<F>(mut self, build: F) -> Self
    where
        F: FnOnce(Query) -> Query,
    {
        self.push_nested(build, WhereConnector::Or);
        self
    }

    pub fn where_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_in(column, values, WhereConnector::And, false);
        self
    }

    pub fn or_where_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_in(column, values, WhereConnector::Or, false);
        self
    }

    pub fn where_not_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_in(column, values, WhereConnector::And, true);
        self
    }

    pub fn or_where_not_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_in(column, values, WhereConnector::Or, true);
        self
    }

    pub fn where_between<L, H>(mut self, column: &str, low: L, high: H) -> Self
    where
        L: Into<Value>,
        H: Into<Value>,
    {
        self.push_between(column, low.into(), high.into(), WhereConnector::And, false);
        self
    }

    pub fn or_where_between<L, H>(mut self, column: &str, low: L, high: H) -> Self
    where
        L: Into<Value>,
        H: Into<Value>,
    {
        self.push_between(column, low.into(), high.into(), WhereConnector::Or, false);
        self
    }

    pub fn where_not_between<L, H>(mut self, column: &str, low: L, high: H) -> Self
    where
        L: Into<Value>,
        H: Into<Value>,
    {
        self.push_between(column, low.into(), high.into(), WhereConnector::And, true);
        self
    }

    pub fn or_where_not_between<L, H>(mut self, column: &str, low: L, high: H) -> Self
    where
        L: Into<Value>,
        H: Into<Value>,
    {
        self.push_between(column, low.into(), high.into(), WhereConnector::Or, true);
        self
    }

    pub fn where_null(mut self, column: &str) -> Self {
        self.wheres.push(Where::Null {
            column: column.to_string(),
            connector: WhereConnector::And,
        });
        self
    }

    pub fn or_where_null(mut self, column: &str) -> Self {
        self.wheres.push(Where::Null {
            column: column.to_string(),
            connector: WhereConnector::Or,
        });
        self
    }

    pub fn where_not_null(mut self, column: &str) -> Self {
        self.wheres.push(Where::NotNull {
            column: column.to_string(),
            connector: WhereConnector::And,
        });
        self
    }

    pub fn or_where_not_null(mut self, column: &str) -> Self {
        self.wheres.push(Where::NotNull {
            column: column.to_string(),
            connector: WhereConnector::Or,
        });
        self
    }

    /// Add a verbatim predicate with its own bindings.
    ///
    /// The SQL is inserted as written; never build it from untrusted input.
    pub fn raw_where(mut self, sql: &str, bindings: Vec<Value>) -> Self {
        self.push_raw(sql, bindings, WhereConnector::And);
        self
    }

    /// OR-connected form of [`Query::raw_where`], equally unsanitized
    pub fn raw_or_where(mut self, sql: &str, bindings: Vec<Value>) -> Self {
        self.push_raw(sql, bindings, WhereConnector::Or);
        self
    }

    /// `column IN (<sub-select>)`
    pub fn where_in_query(mut self, column: &str, query: Query) -> Self {
        self.where_bindings.extend(query.bindings());
        self.wheres.push(Where::InQuery {
            column: column.to_string(),
            query: Box::new(query),
            connector: WhereConnector::And,
        });
        self
    }

    /// `column NOT IN (<sub-select>)`
    pub fn where_not_in_query(mut self, column: &str, query: Query) -> Self {
        self.where_bindings.extend(query.bindings());
        self.wheres.push(Where::NotInQuery {
            column: column.to_string(),
            query: Box::new(query),
            connector: WhereConnector::And,
        });
        self
    }

    pub fn where_exists(mut self, query: Query) -> Self {
        self.where_bindings.extend(query.bindings());
        self.wheres.push(Where::Exists {
            query: Box::new(query),
            connector: WhereConnector::And,
        });
        self
    }

    pub fn where_not_exists(mut self, query: Query) -> Self {
        self.where_bindings.extend(query.bindings());
        self.wheres.push(Where::NotExists {
            query: Box::new(query),
            connector: WhereConnector::And,
        });
        self
    }

    /// Drop every predicate and its bindings
    pub fn reset_where(mut self) -> Self {
        self.wheres.clear();
        self.where_bindings.clear();
        self
    }

    // ---------------------------------------------------------------------
    // Joins
    // ---------------------------------------------------------------------

    /// INNER JOIN on a single column comparison
    pub fn join<O>(self, table: &str, left: &str, operator: O, right: &str) -> Self
    where
        O: IntoOperator,
    {
        self.join_with(JoinType::Inner, table, |join| join.on(left, operator, right))
    }

    pub fn left_join<O>(self, table: &str, left: &str, operator: O, right: &str) -> Self
    where
        O: IntoOperator,
    {
        self.join_with(JoinType::Left, table, |join| join.on(left, operator, right))
    }

    pub fn right_join<O>(self, table: &str, left: &str, operator: O, right: &str) -> Self
    where
        O: IntoOperator,
    {
        self.join_with(JoinType::Right, table, |join| join.on(left, operator, right))
    }

    pub fn cross_join(mut self, table: &str) -> Self {
        self.joins.push(JoinClause::new(JoinType::Cross, table));
        self
    }

    /// Join with conditions built by a closure over the [`JoinClause`]
    pub fn join_with<F>(mut self, join_type: JoinType, table: &str, build: F) -> Self
    where
        F: FnOnce(JoinClause) -> JoinClause,
    {
        self.joins.push(build(JoinClause::new(join_type, table)));
        self
    }

    // ---------------------------------------------------------------------
    // Grouping, ordering and paging
    // ---------------------------------------------------------------------

    pub fn group_by<C>(mut self, columns: C) -> Self
    where
        C: IntoColumns,
    {
        self.groupings.extend(columns.into_columns());
        self
    }

    pub fn having<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.push_having(condition, WhereConnector::And);
        self
    }

    pub fn or_having<C>(mut self, condition: C) -> Self
    where
        C: IntoCondition,
    {
        self.push_having(condition, WhereConnector::Or);
        self
    }

    /// Order by a column; accepts `SortDirection` or `"asc"` / `"desc"`
    pub fn order_by<D>(mut self, column: &str, direction: D) -> Self
    where
        D: Into<SortDirection>,
    {
        self.orderings.push(OrderByClause {
            column: column.to_string(),
            direction: direction.into(),
        });
        self
    }

    pub fn skip(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn take(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Limit and offset for a 1-based page number
    pub fn for_page(mut self, page: u64, per_page: u64) -> Self {
        self.set_page(page, per_page);
        self
    }

    // ---------------------------------------------------------------------
    // Terminal reads
    // ---------------------------------------------------------------------

    /// Run the SELECT and return every row.
    ///
    /// The select list is reset afterwards so the same builder can be reused
    /// with a different projection.
    pub async fn get<C>(&mut self, db: &Database<C>) -> Result<Vec<Row>>
    where
        C: Connection,
    {
        let grammar = db.grammar();
        let sql = grammar.compile_select(self);
        let result = match sql {
            Ok(sql) => db.select(&sql, &self.bindings()).await,
            Err(err) => Err(err),
        };
        self.selects = None;

        let mut rows = result?;
        if self.offset.unwrap_or(0) > 0 {
            if let Some(column) = grammar.row_number_column() {
                for row in &mut rows {
                    row.remove(column);
                }
            }
        }
        Ok(rows)
    }

    /// Run the SELECT and deserialize every row into `T`
    pub async fn get_as<T, C>(&mut self, db: &Database<C>) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        C: Connection,
    {
        self.get(db).await?.into_iter().map(deserialize_row).collect()
    }

    /// First matching row; sets the limit to one
    pub async fn first<C>(&mut self, db: &Database<C>) -> Result<Option<Row>>
    where
        C: Connection,
    {
        self.limit = Some(1);
        Ok(self.get(db).await?.into_iter().next())
    }

    pub async fn first_as<T, C>(&mut self, db: &Database<C>) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        C: Connection,
    {
        self.first(db).await?.map(deserialize_row).transpose()
    }

    /// Value of a single column from the first matching row
    pub async fn only<C>(
        &mut self,
        db: &Database<C>,
        column: &str,
    ) -> Result<Option<serde_json::Value>>
    where
        C: Connection,
    {
        self.selects = Some(vec![Selection::Column(column.to_string())]);
        match self.first(db).await? {
            Some(row) => Ok(Some(self.take_column(row, column)?)),
            None => Ok(None),
        }
    }

    /// Row with the given primary key
    pub async fn find<C, V>(&mut self, db: &Database<C>, id: V) -> Result<Option<Row>>
    where
        C: Connection,
        V: Into<Value>,
    {
        self.push_basic(("id", id), WhereConnector::And);
        self.first(db).await
    }

    /// One column from every matching row
    pub async fn lists<C>(&mut self, db: &Database<C>, column: &str) -> Result<Vec<serde_json::Value>>
    where
        C: Connection,
    {
        self.selects = Some(vec![Selection::Column(column.to_string())]);
        let rows = self.get(db).await?;
        rows.into_iter()
            .map(|row| self.take_column(row, column))
            .collect()
    }

    /// One column from every matching row, keyed by another column
    pub async fn lists_by<C>(
        &mut self,
        db: &Database<C>,
        column: &str,
        key: &str,
    ) -> Result<Vec<(String, serde_json::Value)>>
    where
        C: Connection,
    {
        self.selects = Some(vec![
            Selection::Column(column.to_string()),
            Selection::Column(key.to_string()),
        ]);
        let rows = self.get(db).await?;

        let mut pairs = Vec::with_capacity(rows.len());
        for mut row in rows {
            let key_value = row
                .remove(result_key(key))
                .ok_or_else(|| Error::column_not_found(&self.table, key))?;
            let value = self.take_column(row, column)?;
            pairs.push((key_to_string(key_value), value));
        }
        Ok(pairs)
    }

    /// Run an aggregate over the current predicates.
    ///
    /// The aggregate only applies to this call; the builder keeps its select
    /// list for later reads.
    pub async fn aggregate<C, Cols>(
        &mut self,
        db: &Database<C>,
        function: AggregateFunction,
        columns: Cols,
    ) -> Result<Option<serde_json::Value>>
    where
        C: Connection,
        Cols: IntoColumns,
    {
        self.aggregate = Some(Aggregate {
            function,
            columns: columns.into_columns(),
        });
        let sql = db.grammar().compile_select(self);
        self.aggregate = None;

        let rows = db.select(&sql?, &self.bindings()).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|mut row| row.remove("aggregate"))
            .filter(|value| !value.is_null()))
    }

    pub async fn count<C>(&mut self, db: &Database<C>) -> Result<u64>
    where
        C: Connection,
    {
        let value = self.aggregate(db, AggregateFunction::Count, "*").await?;
        Ok(value.as_ref().and_then(json_to_u64).unwrap_or(0))
    }

    pub async fn min<C>(&mut self, db: &Database<C>, column: &str) -> Result<Option<serde_json::Value>>
    where
        C: Connection,
    {
        self.aggregate(db, AggregateFunction::Min, column).await
    }

    pub async fn max<C>(&mut self, db: &Database<C>, column: &str) -> Result<Option<serde_json::Value>>
    where
        C: Connection,
    {
        self.aggregate(db, AggregateFunction::Max, column).await
    }

    pub async fn avg<C>(&mut self, db: &Database<C>, column: &str) -> Result<Option<serde_json::Value>>
    where
        C: Connection,
    {
        self.aggregate(db, AggregateFunction::Avg, column).await
    }

    pub async fn sum<C>(&mut self, db: &Database<C>, column: &str) -> Result<Option<serde_json::Value>>
    where
        C: Connection,
    {
        self.aggregate(db, AggregateFunction::Sum, column).await
    }

    /// Paginate with a count query followed by the page fetch.
    ///
    /// Orderings are left out of the count and restored for the fetch. The
    /// requested page is clamped to `1..=last_page`.
    pub async fn paginate<C>(
        &mut self,
        db: &Database<C>,
        page: u64,
        per_page: u64,
    ) -> Result<Paginator>
    where
        C: Connection,
    {
        let per_page = per_page.max(1);

        let orderings = std::mem::take(&mut self.orderings);
        let (limit, offset) = (self.limit.take(), self.offset.take());
        let total = self.count(db).await;
        self.orderings = orderings;
        let total = match total {
            Ok(total) => total,
            Err(err) => {
                self.limit = limit;
                self.offset = offset;
                return Err(err);
            }
        };

        let last_page = total.div_ceil(per_page).max(1);
        let page = page.clamp(1, last_page);
        self.set_page(page, per_page);

        let results = self.get(db).await?;
        Ok(Paginator {
            results,
            total,
            page,
            per_page,
            last_page,
        })
    }

    // ---------------------------------------------------------------------
    // Terminal writes
    // ---------------------------------------------------------------------

    /// Insert one row or many rows; returns the affected row count
    pub async fn insert<C, D>(&self, db: &Database<C>, data: D) -> Result<u64>
    where
        C: Connection,
        D: IntoInsertData,
    {
        let values = InsertValues::from_rows(data.into_rows())?;
        let sql = db.grammar().compile_insert(self, &values)?;
        Ok(db.execute(&sql, &values.bindings()).await?.rows_affected)
    }

    /// Insert one row and return its generated key; `id_column` defaults to `id`
    pub async fn insert_get_id<C, D>(
        &self,
        db: &Database<C>,
        data: D,
        id_column: Option<&str>,
    ) -> Result<Option<i64>>
    where
        C: Connection,
        D: IntoRow,
    {
        let id_column = id_column.unwrap_or("id");
        let values = InsertValues::from_rows(vec![data.into_row()])?;
        let grammar = db.grammar();
        let sql = grammar.compile_insert_get_id(self, &values, id_column)?;

        if grammar.returns_inserted_id() {
            let rows = db.select(&sql, &values.bindings()).await?;
            return Ok(rows
                .into_iter()
                .next()
                .and_then(|mut row| row.remove(id_column))
                .as_ref()
                .and_then(serde_json::Value::as_i64));
        }

        Ok(db.execute(&sql, &values.bindings()).await?.last_insert_id)
    }

    /// Update matching rows; returns the affected row count
    pub async fn update<C, D>(&self, db: &Database<C>, data: D) -> Result<u64>
    where
        C: Connection,
        D: IntoRow,
    {
        let values = data.into_row();
        if values.is_empty() {
            return Err(Error::invalid_query("UPDATE requires at least one column"));
        }

        let sql = db.grammar().compile_update(self, &values)?;
        let bindings: Vec<Value> = values
            .into_iter()
            .map(|(_, value)| value)
            .chain(self.bindings())
            .filter(|value| !value.is_raw())
            .collect();

        Ok(db.execute(&sql, &bindings).await?.rows_affected)
    }

    pub async fn increment<C>(&self, db: &Database<C>, column: &str, amount: i64) -> Result<u64>
    where
        C: Connection,
    {
        self.adjust(db, column, amount, "+").await
    }

    pub async fn decrement<C>(&self, db: &Database<C>, column: &str, amount: i64) -> Result<u64>
    where
        C: Connection,
    {
        self.adjust(db, column, amount, "-").await
    }

    pub async fn delete<C>(&self, db: &Database<C>) -> Result<u64>
    where
        C: Connection,
    {
        let sql = db.grammar().compile_delete(self)?;
        Ok(db.execute(&sql, &self.bindings()).await?.rows_affected)
    }

    /// Delete the row with the given primary key
    pub async fn delete_id<C, V>(self, db: &Database<C>, id: V) -> Result<u64>
    where
        C: Connection,
        V: Into<Value>,
    {
        self.where_(("id", id)).delete(db).await
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    pub(crate) fn push_basic<C>(&mut self, condition: C, connector: WhereConnector)
    where
        C: IntoCondition,
    {
        let (column, operator, value) = condition.into_condition();
        self.where_bindings.push(value.clone());
        self.wheres.push(Where::Basic {
            column,
            operator,
            value,
            connector,
        });
    }

    fn push_nested<F>(&mut self, build: F, connector: WhereConnector)
    where
        F: FnOnce(Query) -> Query,
    {
        let nested = build(Query::new(&self.table));
        if nested.wheres.is_empty() {
            return;
        }

        self.where_bindings.extend(nested.where_bindings);
        self.wheres.push(Where::Nested {
            wheres: nested.wheres,
            connector,
        });
    }

    fn push_in<I, V>(&mut self, column: &str, values: I, connector: WhereConnector, negated: bool)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.where_bindings.extend(values.iter().cloned());

        let column = column.to_string();
        self.wheres.push(if negated {
            Where::NotIn {
                column,
                values,
                connector,
            }
        } else {
            Where::In {
                column,
                values,
                connector,
            }
        });
    }

    fn push_between(
        &mut self,
        column: &str,
        low: Value,
        high: Value,
        connector: WhereConnector,
        negated: bool,
    ) {
        self.where_bindings.push(low.clone());
        self.where_bindings.push(high.clone());

        let column = column.to_string();
        self.wheres.push(if negated {
            Where::NotBetween {
                column,
                low,
                high,
                connector,
            }
        } else {
            Where::Between {
                column,
                low,
                high,
                connector,
            }
        });
    }

    fn push_raw(&mut self, sql: &str, bindings: Vec<Value>, connector: WhereConnector) {
        self.where_bindings.extend(bindings);
        self.wheres.push(Where::Raw {
            sql: sql.to_string(),
            connector,
        });
    }

    fn push_having<C>(&mut self, condition: C, connector: WhereConnector)
    where
        C: IntoCondition,
    {
        let (column, operator, value) = condition.into_condition();
        self.having_bindings.push(value.clone());
        self.havings.push(HavingCondition {
            column,
            operator,
            value,
            connector,
        });
    }

    fn set_page(&mut self, page: u64, per_page: u64) {
        self.offset = Some(page.max(1).saturating_sub(1) * per_page);
        self.limit = Some(per_page);
    }

    async fn adjust<C>(&self, db: &Database<C>, column: &str, amount: i64, sign: &str) -> Result<u64>
    where
        C: Connection,
    {
        let expression = format!("{} {} {}", db.grammar().wrap(column), sign, amount);
        self.update(db, vec![(column, crate::raw(expression))]).await
    }

    fn take_column(&self, mut row: Row, column: &str) -> Result<serde_json::Value> {
        row.remove(result_key(column))
            .ok_or_else(|| Error::column_not_found(&self.table, column))
    }
}

impl InsertValues {
    /// Align rows on the first row's columns
    pub fn from_rows(rows: Vec<Vec<(String, Value)>>) -> Result<Self> {
        let mut rows = rows.into_iter();
        let first = match rows.next() {
            Some(first) if !first.is_empty() => first,
            _ => return Err(Error::invalid_query("INSERT requires at least one value")),
        };

        let (columns, first_values): (Vec<String>, Vec<Value>) = first.into_iter().unzip();
        let mut aligned = vec![first_values];

        for row in rows {
            if row.len() != columns.len() {
                return Err(Error::invalid_query(
                    "every inserted row must have the same columns",
                ));
            }
            let mut row: HashMap<String, Value> = row.into_iter().collect();
            let values = columns
                .iter()
                .map(|column| {
                    row.remove(column).ok_or_else(|| {
                        Error::invalid_query(format!("inserted row is missing column '{column}'"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            aligned.push(values);
        }

        Ok(Self {
            columns,
            rows: aligned,
        })
    }

    /// Row values in placeholder order, raw values excluded
    pub fn bindings(&self) -> Vec<Value> {
        self.rows
            .iter()
            .flatten()
            .filter(|value| !value.is_raw())
            .cloned()
            .collect()
    }
}

/// Trait for a single row of column/value pairs
pub trait IntoRow {
    fn into_row(self) -> Vec<(String, Value)>;
}

impl<V> IntoRow for Vec<(&str, V)>
where
    V: Into<Value>,
{
    fn into_row(self) -> Vec<(String, Value)> {
        self.into_iter()
            .map(|(column, value)| (column.to_string(), value.into()))
            .collect()
    }
}

impl<V, const N: usize> IntoRow for [(&str, V); N]
where
    V: Into<Value>,
{
    fn into_row(self) -> Vec<(String, Value)> {
        self.into_iter()
            .map(|(column, value)| (column.to_string(), value.into()))
            .collect()
    }
}

/// Columns are sorted by name so the compiled SQL is deterministic
impl<K, V> IntoRow for HashMap<K, V>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_row(self) -> Vec<(String, Value)> {
        let sorted: BTreeMap<String, Value> = self
            .into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .collect();
        sorted.into_iter().collect()
    }
}

impl<K, V> IntoRow for BTreeMap<K, V>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_row(self) -> Vec<(String, Value)> {
        self.into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .collect()
    }
}

/// Trait for INSERT payloads: a single row or a list of rows
pub trait IntoInsertData {
    fn into_rows(self) -> Vec<Vec<(String, Value)>>;
}

impl<V> IntoInsertData for Vec<(&str, V)>
where
    V: Into<Value>,
{
    fn into_rows(self) -> Vec<Vec<(String, Value)>> {
        vec![self.into_row()]
    }
}

impl<V, const N: usize> IntoInsertData for [(&str, V); N]
where
    V: Into<Value>,
{
    fn into_rows(self) -> Vec<Vec<(String, Value)>> {
        vec![self.into_row()]
    }
}

impl<K, V> IntoInsertData for HashMap<K, V>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_rows(self) -> Vec<Vec<(String, Value)>> {
        vec![self.into_row()]
    }
}

impl<K, V> IntoInsertData for BTreeMap<K, V>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_rows(self) -> Vec<Vec<(String, Value)>> {
        vec![self.into_row()]
    }
}

impl<V> IntoInsertData for Vec<Vec<(&str, V)>>
where
    V: Into<Value>,
{
    fn into_rows(self) -> Vec<Vec<(String, Value)>> {
        self.into_iter().map(IntoRow::into_row).collect()
    }
}

impl<K, V> IntoInsertData for Vec<HashMap<K, V>>
where
    K: Into<String>,
    V: Into<Value>,
{
    fn into_rows(self) -> Vec<Vec<(String, Value)>> {
        self.into_iter().map(IntoRow::into_row).collect()
    }
}

/// Key under which a selected column comes back in a result row
fn result_key(column: &str) -> &str {
    match crate::grammar::split_alias(column) {
        Some((_, alias)) => alias,
        None => column.rsplit('.').next().unwrap_or(column),
    }
}

fn key_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn json_to_u64(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn deserialize_row<T: DeserializeOwned>(row: Row) -> Result<T> {
    Ok(serde_json::from_value(serde_json::Value::Object(row))?)
}
