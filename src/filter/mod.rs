//! Rule-based filter trees and the compact-condition builder
//!
//! A filter is a recursive tree of rules grouped under `AND`/`OR`
//! conditions. Trees are usually written in the compact array syntax and
//! built through [`ConditionParser`] or [`from_conditions`]:
//!
//! ```rust,ignore
//! use serde_json::json;
//!
//! let group = relist::filter::from_conditions(&json!([
//!     "AND",
//!     ["status", "=", "running"],
//!     ["cpu", ">=", 4],
//!     ["OR", ["region", "in", ["ap-1", "ap-2"]], ["zone", "=", "ap-3a"]],
//! ]))?;
//! ```
//!
//! The built tree serializes as `{"condition": "AND", "rules": [..]}` and
//! is typically embedded into the request body a
//! [`PageFetcher`](crate::core::PageFetcher) implementation sends.

pub mod builder;
pub mod operator;

pub use builder::{ConditionParser, from_conditions};
pub use operator::Operator;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Logical connective of a filter group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Condition {
    And,
    Or,
}

impl Condition {
    /// Resolve a written condition token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "AND" => Some(Condition::And),
            "OR" => Some(Condition::Or),
            _ => None,
        }
    }
}

/// One field comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

/// A rule or a nested group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    Group(FilterGroup),
    Rule(FilterRule),
}

/// A validated filter tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub condition: Condition,
    pub rules: Vec<FilterNode>,
}

impl FilterGroup {
    /// An empty group under the given condition
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            rules: Vec::new(),
        }
    }

    /// Whether the group constrains anything at all
    ///
    /// Groups can end up empty when every written rule had an empty value
    /// and was dropped; backends treat an empty group as "match all".
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
