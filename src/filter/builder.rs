//! Building filter trees from compact condition arrays
//!
//! The compact syntax is a nested array: the first element names the
//! group condition, every following element is either a `[field,
//! operator, value]` rule or another group starting with `"AND"`/`"OR"`.
//!
//! Rules whose value is empty (missing, null, blank string, empty array,
//! or a non-finite number) are dropped rather than rejected — a search
//! form routinely submits untouched inputs — and the dropped field names
//! are reported once through `tracing`.

use crate::core::error::FilterError;
use crate::filter::{Condition, FilterGroup, FilterNode, FilterRule, Operator};
use serde_json::Value;

/// Parser for the compact condition syntax
///
/// Collects the fields of dropped empty-valued rules across one parse so
/// callers can surface them. For one-shot use, [`from_conditions`] wraps
/// this and emits the diagnostic itself.
#[derive(Debug, Default)]
pub struct ConditionParser {
    skipped: Vec<String>,
}

impl ConditionParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter tree from a compact condition array
    pub fn parse(&mut self, input: &Value) -> Result<FilterGroup, FilterError> {
        let items = input.as_array().ok_or(FilterError::NotAnArray)?;
        self.parse_group(items)
    }

    /// Fields dropped for emptiness during the last parse
    pub fn skipped_fields(&self) -> &[String] {
        &self.skipped
    }

    fn parse_group(&mut self, items: &[Value]) -> Result<FilterGroup, FilterError> {
        let condition = items
            .first()
            .and_then(Value::as_str)
            .and_then(Condition::from_token)
            .ok_or_else(|| FilterError::InvalidCondition {
                found: items.first().map(Value::to_string).unwrap_or_default(),
            })?;

        let mut group = FilterGroup::new(condition);
        for (index, entry) in items.iter().enumerate().skip(1) {
            let entry = entry
                .as_array()
                .ok_or(FilterError::EntryNotArray { index })?;

            let is_group = entry
                .first()
                .and_then(Value::as_str)
                .and_then(Condition::from_token)
                .is_some();
            if is_group {
                group.rules.push(FilterNode::Group(self.parse_group(entry)?));
                continue;
            }

            if let Some(rule) = self.parse_rule(entry, index)? {
                group.rules.push(FilterNode::Rule(rule));
            }
        }
        Ok(group)
    }

    /// Parse one `[field, operator, value]` entry
    ///
    /// Returns `Ok(None)` when the rule is dropped for an empty value.
    fn parse_rule(
        &mut self,
        entry: &[Value],
        index: usize,
    ) -> Result<Option<FilterRule>, FilterError> {
        let field = entry
            .first()
            .and_then(Value::as_str)
            .ok_or(FilterError::FieldNotString { index })?;

        let token = entry
            .get(1)
            .and_then(Value::as_str)
            .ok_or_else(|| FilterError::OperatorNotString {
                field: field.to_string(),
            })?;

        let operator =
            Operator::from_token(token).ok_or_else(|| FilterError::UnknownOperator {
                field: field.to_string(),
                operator: token.to_string(),
            })?;

        // Emptiness is checked before the type classes: an untouched form
        // input is a drop, not an error.
        let value = entry.get(2);
        if is_empty_value(value) {
            self.skipped.push(field.to_string());
            return Ok(None);
        }
        let value = value.cloned().unwrap_or(Value::Null);

        if operator.requires_array() && !value.is_array() {
            return Err(FilterError::TypeMismatch {
                field: field.to_string(),
                operator: operator.as_str(),
                expected: "an array value",
            });
        }
        if operator.requires_number() && !value.is_number() {
            return Err(FilterError::TypeMismatch {
                field: field.to_string(),
                operator: operator.as_str(),
                expected: "a numeric value",
            });
        }
        if operator.requires_string() && !value.is_string() {
            return Err(FilterError::TypeMismatch {
                field: field.to_string(),
                operator: operator.as_str(),
                expected: "a string value",
            });
        }

        Ok(Some(FilterRule {
            field: field.to_string(),
            operator,
            value,
        }))
    }
}

/// Build a filter tree from a compact condition array
///
/// Convenience wrapper over [`ConditionParser`] that logs the fields of
/// any dropped empty-valued rules as a single diagnostic.
pub fn from_conditions(input: &Value) -> Result<FilterGroup, FilterError> {
    let mut parser = ConditionParser::new();
    let group = parser.parse(input)?;
    if !parser.skipped_fields().is_empty() {
        tracing::debug!(
            fields = ?parser.skipped_fields(),
            "dropped filter rules with empty values"
        );
    }
    Ok(group)
}

fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        // JSON itself cannot carry NaN/Infinity, but a programmatically
        // built Number that does not convert to a finite f64 counts as
        // empty the same way.
        Some(Value::Number(n)) => n.as_f64().is_none_or(|f| !f.is_finite()),
        _ => false,
    }
}
