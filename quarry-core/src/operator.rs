//! Whitelisted SQL comparison operators

use std::fmt::{self, Display};

/// A comparison operator accepted by `where_`, `having` and join conditions.
///
/// Only the operators listed as constants here can be constructed, so an
/// operator string taken from user input can never smuggle SQL into a
/// compiled statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator(&'static str);

/// Every operator the builder accepts, in lookup order.
const WHITELIST: &[Operator] = &[
    Operator::EQ,
    Operator::LT,
    Operator::GT,
    Operator::LTE,
    Operator::GTE,
    Operator::NE,
    Operator::NEQ,
    Operator::LIKE,
    Operator::NOT_LIKE,
    Operator::ILIKE,
    Operator::NOT_ILIKE,
    Operator::REGEXP,
    Operator::NOT_REGEXP,
    Operator::BIT_AND,
    Operator::BIT_OR,
    Operator::BIT_XOR,
    Operator::SHIFT_LEFT,
    Operator::SHIFT_RIGHT,
];

impl Operator {
    pub const EQ: Self = Operator("=");
    pub const LT: Self = Operator("<");
    pub const GT: Self = Operator(">");
    pub const LTE: Self = Operator("<=");
    pub const GTE: Self = Operator(">=");
    pub const NE: Self = Operator("<>");
    pub const NEQ: Self = Operator("!=");
    pub const LIKE: Self = Operator("LIKE");
    pub const NOT_LIKE: Self = Operator("NOT LIKE");
    pub const ILIKE: Self = Operator("ILIKE");
    pub const NOT_ILIKE: Self = Operator("NOT ILIKE");
    pub const REGEXP: Self = Operator("REGEXP");
    pub const NOT_REGEXP: Self = Operator("NOT REGEXP");
    pub const BIT_AND: Self = Operator("&");
    pub const BIT_OR: Self = Operator("|");
    pub const BIT_XOR: Self = Operator("^");
    pub const SHIFT_LEFT: Self = Operator("<<");
    pub const SHIFT_RIGHT: Self = Operator(">>");

    /// Look up a whitelisted operator, ignoring case and surrounding spaces.
    ///
    /// # Examples
    /// ```
    /// use quarry_core::Operator;
    ///
    /// assert_eq!(Operator::parse("not like"), Some(Operator::NOT_LIKE));
    /// assert_eq!(Operator::parse("; DROP TABLE users"), None);
    /// ```
    pub fn parse(candidate: &str) -> Option<Self> {
        let normalized = candidate
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();

        WHITELIST
            .iter()
            .copied()
            .find(|op| op.0 == normalized)
    }

    /// Whether the candidate string names a whitelisted operator
    pub fn is_supported(candidate: &str) -> bool {
        Self::parse(candidate).is_some()
    }

    /// Get the string representation of the operator
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Default for Operator {
    fn default() -> Self {
        Operator::EQ
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trait for types that can be converted to SQL operators
pub trait IntoOperator {
    fn into_operator(self) -> Operator;
}

impl IntoOperator for Operator {
    fn into_operator(self) -> Operator {
        self
    }
}

/// Strings outside the whitelist fall back to `=`
impl IntoOperator for &str {
    fn into_operator(self) -> Operator {
        Operator::parse(self).unwrap_or_default()
    }
}

impl IntoOperator for String {
    fn into_operator(self) -> Operator {
        self.as_str().into_operator()
    }
}

/// Convenience module for operator constants
pub mod op {
    use super::Operator;

    pub const EQ: Operator = Operator::EQ;
    pub const LT: Operator = Operator::LT;
    pub const GT: Operator = Operator::GT;
    pub const LTE: Operator = Operator::LTE;
    pub const GTE: Operator = Operator::GTE;
    pub const NE: Operator = Operator::NE;
    pub const NEQ: Operator = Operator::NEQ;
    pub const LIKE: Operator = Operator::LIKE;
    pub const NOT_LIKE: Operator = Operator::NOT_LIKE;
    pub const ILIKE: Operator = Operator::ILIKE;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_constants() {
        assert_eq!(Operator::GT.as_str(), ">");
        assert_eq!(Operator::LT.as_str(), "<");
        assert_eq!(Operator::EQ.as_str(), "=");
        assert_eq!(Operator::LIKE.as_str(), "LIKE");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Operator::GT), ">");
        assert_eq!(format!("{}", Operator::NOT_LIKE), "NOT LIKE");
    }

    #[test]
    fn test_string_conversion() {
        assert_eq!(">".into_operator(), Operator::GT);
        assert_eq!("LIKE".into_operator(), Operator::LIKE);
        assert_eq!("like".into_operator(), Operator::LIKE);
        assert_eq!(">=".into_operator(), Operator::GTE);
        assert_eq!("not   like".into_operator(), Operator::NOT_LIKE);
    }

    #[test]
    fn test_unknown_operator_falls_back_to_equals() {
        assert_eq!("INVALID".into_operator(), Operator::EQ);
        assert_eq!("= 1 OR 1 =".into_operator(), Operator::EQ);
        assert!(!Operator::is_supported("<=>"));
    }

    #[test]
    fn test_operator_equality() {
        assert_eq!(Operator::GT, ">".into_operator());
        assert_eq!(op::ILIKE, "ilike".into_operator());
    }
}
