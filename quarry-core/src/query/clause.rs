//! Clause types accumulated by the query builder

use std::fmt::{self, Display};

use super::Query;
use crate::{IntoOperator, Operator, Value};

/// Trait for conditions that can be used in WHERE and HAVING clauses
pub trait IntoCondition {
    fn into_condition(self) -> (String, Operator, Value);
}

// Shorthand equality: where_(("age", 18))
impl<T> IntoCondition for (&str, T)
where
    T: Into<Value>,
{
    fn into_condition(self) -> (String, Operator, Value) {
        (self.0.to_string(), Operator::EQ, self.1.into())
    }
}

// Explicit operators: where_(("age", op::GT, 18)) or where_(("age", ">", 18))
impl<T, O> IntoCondition for (&str, O, T)
where
    T: Into<Value>,
    O: IntoOperator,
{
    fn into_condition(self) -> (String, Operator, Value) {
        (self.0.to_string(), self.1.into_operator(), self.2.into())
    }
}

/// How WHERE conditions are connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhereConnector {
    #[default]
    And,
    Or,
}

impl Display for WhereConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WhereConnector::And => write!(f, "AND"),
            WhereConnector::Or => write!(f, "OR"),
        }
    }
}

/// A single node of the predicate tree
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    Basic {
        column: String,
        operator: Operator,
        value: Value,
        connector: WhereConnector,
    },
    In {
        column: String,
        values: Vec<Value>,
        connector: WhereConnector,
    },
    NotIn {
        column: String,
        values: Vec<Value>,
        connector: WhereConnector,
    },
    Between {
        column: String,
        low: Value,
        high: Value,
        connector: WhereConnector,
    },
    NotBetween {
        column: String,
        low: Value,
        high: Value,
        connector: WhereConnector,
    },
    Null {
        column: String,
        connector: WhereConnector,
    },
    NotNull {
        column: String,
        connector: WhereConnector,
    },
    /// Verbatim SQL, never sanitized
    Raw {
        sql: String,
        connector: WhereConnector,
    },
    /// A parenthesized group of predicates
    Nested {
        wheres: Vec<Where>,
        connector: WhereConnector,
    },
    InQuery {
        column: String,
        query: Box<Query>,
        connector: WhereConnector,
    },
    NotInQuery {
        column: String,
        query: Box<Query>,
        connector: WhereConnector,
    },
    Exists {
        query: Box<Query>,
        connector: WhereConnector,
    },
    NotExists {
        query: Box<Query>,
        connector: WhereConnector,
    },
}

impl Where {
    pub fn connector(&self) -> WhereConnector {
        match self {
            Where::Basic { connector, .. }
            | Where::In { connector, .. }
            | Where::NotIn { connector, .. }
            | Where::Between { connector, .. }
            | Where::NotBetween { connector, .. }
            | Where::Null { connector, .. }
            | Where::NotNull { connector, .. }
            | Where::Raw { connector, .. }
            | Where::Nested { connector, .. }
            | Where::InQuery { connector, .. }
            | Where::NotInQuery { connector, .. }
            | Where::Exists { connector, .. }
            | Where::NotExists { connector, .. } => *connector,
        }
    }
}

/// JOIN types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER"),
            JoinType::Left => write!(f, "LEFT"),
            JoinType::Right => write!(f, "RIGHT"),
            JoinType::Full => write!(f, "FULL OUTER"),
            JoinType::Cross => write!(f, "CROSS"),
        }
    }
}

/// A condition in a JOIN ON clause
#[derive(Debug, Clone, PartialEq)]
pub struct JoinCondition {
    pub left_column: String,
    pub operator: Operator,
    pub right_column: String,
    pub connector: WhereConnector,
}

/// A complete JOIN clause with table and conditions
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: String,
    pub on_conditions: Vec<JoinCondition>,
}

impl JoinClause {
    pub fn new(join_type: JoinType, table: &str) -> Self {
        Self {
            join_type,
            table: table.to_string(),
            on_conditions: Vec::new(),
        }
    }

    /// Add an AND-connected ON condition
    pub fn on<O>(self, left: &str, operator: O, right: &str) -> Self
    where
        O: IntoOperator,
    {
        self.push(left, operator.into_operator(), right, WhereConnector::And)
    }

    /// Add an OR-connected ON condition
    pub fn or_on<O>(self, left: &str, operator: O, right: &str) -> Self
    where
        O: IntoOperator,
    {
        self.push(left, operator.into_operator(), right, WhereConnector::Or)
    }

    fn push(
        mut self,
        left: &str,
        operator: Operator,
        right: &str,
        connector: WhereConnector,
    ) -> Self {
        self.on_conditions.push(JoinCondition {
            left_column: left.to_string(),
            operator,
            right_column: right.to_string(),
            connector,
        });
        self
    }
}

/// Sort direction for ORDER BY clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// `"desc"` in any case sorts descending; anything else ascending
impl From<&str> for SortDirection {
    fn from(direction: &str) -> Self {
        if direction.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

/// An ORDER BY clause
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByClause {
    pub column: String,
    pub direction: SortDirection,
}

/// A HAVING condition (used with GROUP BY)
#[derive(Debug, Clone, PartialEq)]
pub struct HavingCondition {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
    pub connector: WhereConnector,
}

/// One entry of the select list
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Column(String),
    /// Verbatim expression, not wrapped
    Raw(String),
}

/// Aggregation function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Count,
    Min,
    Max,
    Avg,
    Sum,
}

impl AggregateFunction {
    /// Look up an aggregate by its lowercase method name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "count" => Some(Self::Count),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "avg" => Some(Self::Avg),
            "sum" => Some(Self::Sum),
            _ => None,
        }
    }
}

impl Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateFunction::Count => write!(f, "COUNT"),
            AggregateFunction::Min => write!(f, "MIN"),
            AggregateFunction::Max => write!(f, "MAX"),
            AggregateFunction::Avg => write!(f, "AVG"),
            AggregateFunction::Sum => write!(f, "SUM"),
        }
    }
}

/// Aggregate projection replacing the select list for one query
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub function: AggregateFunction,
    pub columns: Vec<String>,
}

/// Trait to convert various types into columns
pub trait IntoColumns {
    fn into_columns(self) -> Vec<String>;
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> Vec<String> {
        self
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> Vec<String> {
        self.into_iter().map(|s| s.to_string()).collect()
    }
}

impl IntoColumns for &[&str] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl IntoColumns for (&str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string()]
    }
}

impl IntoColumns for (&str, &str, &str) {
    fn into_columns(self) -> Vec<String> {
        vec![self.0.to_string(), self.1.to_string(), self.2.to_string()]
    }
}
