//! Filter operator vocabulary
//!
//! Operators are written in conditions either by their canonical
//! snake_case name (`greater_or_equal`) or by a short form (`>=`). The
//! datetime short forms are prefixed with `d` (`d>=`).

use serde::{Deserialize, Serialize};

/// Comparison operator of a filter rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equal,
    NotEqual,
    Greater,
    Less,
    LessOrEqual,
    GreaterOrEqual,
    DatetimeLess,
    DatetimeGreater,
    DatetimeLessOrEqual,
    DatetimeGreaterOrEqual,
    In,
    NotIn,
    IsEmpty,
    IsNotEmpty,
    BeginsWith,
    NotBeginsWith,
    Contains,
    NotContains,
    EndsWith,
    NotEndsWith,
    IsNull,
    IsNotNull,
    Exist,
    NotExist,
}

impl Operator {
    /// Resolve a written operator token, expanding short forms
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "=" | "equal" => Operator::Equal,
            "!=" | "not_equal" => Operator::NotEqual,
            ">" | "greater" => Operator::Greater,
            "<" | "less" => Operator::Less,
            "<=" | "less_or_equal" => Operator::LessOrEqual,
            ">=" | "greater_or_equal" => Operator::GreaterOrEqual,
            "d<" | "datetime_less" => Operator::DatetimeLess,
            "d>" | "datetime_greater" => Operator::DatetimeGreater,
            "d<=" | "datetime_less_or_equal" => Operator::DatetimeLessOrEqual,
            "d>=" | "datetime_greater_or_equal" => Operator::DatetimeGreaterOrEqual,
            "in" => Operator::In,
            "not_in" => Operator::NotIn,
            "is_empty" => Operator::IsEmpty,
            "is_not_empty" => Operator::IsNotEmpty,
            "begins_with" => Operator::BeginsWith,
            "not_begins_with" => Operator::NotBeginsWith,
            "contains" => Operator::Contains,
            "not_contains" => Operator::NotContains,
            "ends_with" => Operator::EndsWith,
            "not_ends_with" => Operator::NotEndsWith,
            "is_null" => Operator::IsNull,
            "is_not_null" => Operator::IsNotNull,
            "exist" => Operator::Exist,
            "not_exist" => Operator::NotExist,
            _ => return None,
        };
        Some(op)
    }

    /// Canonical name, as serialized into a filter tree
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "equal",
            Operator::NotEqual => "not_equal",
            Operator::Greater => "greater",
            Operator::Less => "less",
            Operator::LessOrEqual => "less_or_equal",
            Operator::GreaterOrEqual => "greater_or_equal",
            Operator::DatetimeLess => "datetime_less",
            Operator::DatetimeGreater => "datetime_greater",
            Operator::DatetimeLessOrEqual => "datetime_less_or_equal",
            Operator::DatetimeGreaterOrEqual => "datetime_greater_or_equal",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::BeginsWith => "begins_with",
            Operator::NotBeginsWith => "not_begins_with",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::EndsWith => "ends_with",
            Operator::NotEndsWith => "not_ends_with",
            Operator::IsNull => "is_null",
            Operator::IsNotNull => "is_not_null",
            Operator::Exist => "exist",
            Operator::NotExist => "not_exist",
        }
    }

    /// Operators whose rule value must be an array
    pub fn requires_array(&self) -> bool {
        matches!(
            self,
            Operator::In | Operator::NotIn | Operator::IsEmpty | Operator::IsNotEmpty
        )
    }

    /// Operators whose rule value must be a number
    pub fn requires_number(&self) -> bool {
        matches!(
            self,
            Operator::Less | Operator::LessOrEqual | Operator::Greater | Operator::GreaterOrEqual
        )
    }

    /// Operators whose rule value must be a string
    pub fn requires_string(&self) -> bool {
        matches!(
            self,
            Operator::BeginsWith
                | Operator::NotBeginsWith
                | Operator::Contains
                | Operator::NotContains
                | Operator::EndsWith
                | Operator::NotEndsWith
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_forms_expand() {
        assert_eq!(Operator::from_token("="), Some(Operator::Equal));
        assert_eq!(Operator::from_token("!="), Some(Operator::NotEqual));
        assert_eq!(Operator::from_token(">="), Some(Operator::GreaterOrEqual));
        assert_eq!(Operator::from_token("d<"), Some(Operator::DatetimeLess));
        assert_eq!(
            Operator::from_token("d>="),
            Some(Operator::DatetimeGreaterOrEqual)
        );
    }

    #[test]
    fn test_canonical_names_resolve() {
        for token in [
            "equal",
            "not_equal",
            "greater",
            "less",
            "less_or_equal",
            "greater_or_equal",
            "datetime_less",
            "datetime_greater",
            "datetime_less_or_equal",
            "datetime_greater_or_equal",
            "in",
            "not_in",
            "is_empty",
            "is_not_empty",
            "begins_with",
            "not_begins_with",
            "contains",
            "not_contains",
            "ends_with",
            "not_ends_with",
            "is_null",
            "is_not_null",
            "exist",
            "not_exist",
        ] {
            let op = Operator::from_token(token)
                .unwrap_or_else(|| panic!("token '{token}' should resolve"));
            assert_eq!(op.as_str(), token);
        }
    }

    #[test]
    fn test_unknown_token_rejected() {
        assert_eq!(Operator::from_token("~="), None);
        assert_eq!(Operator::from_token("EQUAL"), None);
        assert_eq!(Operator::from_token(""), None);
    }

    #[test]
    fn test_operator_classes() {
        assert!(Operator::In.requires_array());
        assert!(Operator::IsEmpty.requires_array());
        assert!(Operator::Greater.requires_number());
        assert!(!Operator::DatetimeGreater.requires_number());
        assert!(Operator::Contains.requires_string());
        assert!(!Operator::Equal.requires_string());
    }

    #[test]
    fn test_serializes_as_canonical_name() {
        let token = serde_json::to_value(Operator::GreaterOrEqual).unwrap();
        assert_eq!(token, serde_json::json!("greater_or_equal"));
        let parsed: Operator = serde_json::from_value(token).unwrap();
        assert_eq!(parsed, Operator::GreaterOrEqual);
    }
}
