//! Schema columns and their modifiers

use super::command::IndexKind;
use crate::Value;

/// Logical column type, mapped to a concrete type by each schema grammar
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    String { length: u32 },
    Char { length: u32 },
    Integer,
    BigInteger,
    SmallInteger,
    Float,
    Double,
    Decimal { precision: u32, scale: u32 },
    Boolean,
    Date,
    DateTime,
    Time,
    Timestamp,
    Text,
    MediumText,
    LongText,
    Blob,
    Json,
    Jsonb,
    Uuid,
    IpAddress,
    MacAddress,
    Enum(Vec<String>),
    Set(Vec<String>),
    Geometry,
    Point,
    LineString,
    Polygon,
}

impl ColumnType {
    /// Integer family, the only types that take `increment` and `unsigned`
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ColumnType::Integer | ColumnType::BigInteger | ColumnType::SmallInteger
        )
    }
}

/// An inline index flag set on a column definition
#[derive(Debug, Clone, PartialEq)]
pub struct InlineIndex {
    pub kind: IndexKind,
    pub name: Option<String>,
}

/// A column definition queued on a [`Table`](super::Table)
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
    pub nullable: bool,
    pub default: Option<Value>,
    pub unsigned: bool,
    pub increment: bool,
    pub comment: Option<String>,
    pub charset: Option<String>,
    pub collation: Option<String>,
    pub after: Option<String>,
    pub first: bool,
    /// Modify an existing column instead of adding one
    pub change: bool,
    pub indexes: Vec<InlineIndex>,
}

impl Column {
    pub fn new(name: &str, kind: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            kind,
            nullable: false,
            default: None,
            unsigned: false,
            increment: false,
            comment: None,
            charset: None,
            collation: None,
            after: None,
            first: false,
            change: false,
            indexes: Vec::new(),
        }
    }

    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    /// Default value; `raw(..)` values are emitted verbatim
    pub fn defaults<V>(&mut self, value: V) -> &mut Self
    where
        V: Into<Value>,
    {
        self.default = Some(value.into());
        self
    }

    pub fn unsigned(&mut self) -> &mut Self {
        self.unsigned = true;
        self
    }

    /// Auto-incrementing primary key
    pub fn increment(&mut self) -> &mut Self {
        self.increment = true;
        self
    }

    pub fn comment(&mut self, comment: &str) -> &mut Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn charset(&mut self, charset: &str) -> &mut Self {
        self.charset = Some(charset.to_string());
        self
    }

    pub fn collation(&mut self, collation: &str) -> &mut Self {
        self.collation = Some(collation.to_string());
        self
    }

    /// Place the column after another one (MySQL)
    pub fn after(&mut self, column: &str) -> &mut Self {
        self.after = Some(column.to_string());
        self
    }

    /// Place the column first (MySQL)
    pub fn first(&mut self) -> &mut Self {
        self.first = true;
        self
    }

    pub fn change(&mut self) -> &mut Self {
        self.change = true;
        self
    }

    pub fn primary(&mut self) -> &mut Self {
        self.flag(IndexKind::Primary)
    }

    pub fn unique(&mut self) -> &mut Self {
        self.flag(IndexKind::Unique)
    }

    pub fn fulltext(&mut self) -> &mut Self {
        self.flag(IndexKind::Fulltext)
    }

    pub fn index(&mut self) -> &mut Self {
        self.flag(IndexKind::Index)
    }

    pub fn spatial(&mut self) -> &mut Self {
        self.flag(IndexKind::Spatial)
    }

    /// Name the most recently flagged inline index
    pub fn indexed_as(&mut self, name: &str) -> &mut Self {
        if let Some(index) = self.indexes.last_mut() {
            index.name = Some(name.to_string());
        }
        self
    }

    fn flag(&mut self, kind: IndexKind) -> &mut Self {
        self.indexes.push(InlineIndex { kind, name: None });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_chain() {
        let mut column = Column::new("votes", ColumnType::Integer);
        column.unsigned().nullable().defaults(0).comment("net votes");

        assert!(column.unsigned);
        assert!(column.nullable);
        assert_eq!(column.default, Some(Value::I32(0)));
        assert_eq!(column.comment.as_deref(), Some("net votes"));
    }

    #[test]
    fn test_inline_index_naming() {
        let mut column = Column::new("email", ColumnType::String { length: 200 });
        column.unique().indexed_as("users_email_key").index();

        assert_eq!(
            column.indexes,
            vec![
                InlineIndex {
                    kind: IndexKind::Unique,
                    name: Some("users_email_key".to_string()),
                },
                InlineIndex {
                    kind: IndexKind::Index,
                    name: None,
                },
            ]
        );
    }

    #[test]
    fn test_integer_family() {
        assert!(ColumnType::BigInteger.is_integer());
        assert!(!ColumnType::Float.is_integer());
    }
}
