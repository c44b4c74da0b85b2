//! Typed error handling for relist
//!
//! Errors are grouped by the boundary they occur at:
//!
//! - [`FilterError`]: malformed compact-condition syntax or a value that
//!   does not fit its operator. Always fatal to the build call, so a bad
//!   filter never reaches the backend.
//! - [`SchemaError`]: a raw response payload that is missing or mistypes
//!   a required field when adapted into a typed page response.
//! - [`ConfigError`]: configuration that cannot be read or parsed.
//!
//! Failures coming out of an injected [`PageFetcher`](crate::core::PageFetcher)
//! are not represented here: the coordinator propagates them unchanged as
//! `anyhow::Error` without classifying, wrapping, or retrying.

use std::fmt;

// =============================================================================
// Filter Errors
// =============================================================================

/// Errors raised while building a filter tree from compact conditions
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// The top-level input was not an array
    NotAnArray,

    /// The first element of a group was not `"AND"` or `"OR"`
    InvalidCondition {
        found: String,
    },

    /// A group entry was not itself an array
    EntryNotArray {
        index: usize,
    },

    /// A rule's field was missing or not a string
    FieldNotString {
        index: usize,
    },

    /// A rule's operator was missing or not a string
    OperatorNotString {
        field: String,
    },

    /// A rule used an operator outside the supported set
    UnknownOperator {
        field: String,
        operator: String,
    },

    /// A rule's value does not fit its operator's class
    TypeMismatch {
        field: String,
        operator: &'static str,
        expected: &'static str,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::NotAnArray => {
                write!(f, "conditions must be an array")
            }
            FilterError::InvalidCondition { found } => {
                write!(
                    f,
                    "a condition group must start with \"AND\" or \"OR\" (got {})",
                    found
                )
            }
            FilterError::EntryNotArray { index } => {
                write!(f, "condition entry at position {} must be an array", index)
            }
            FilterError::FieldNotString { index } => {
                write!(
                    f,
                    "rule at position {} must name its field as a string",
                    index
                )
            }
            FilterError::OperatorNotString { field } => {
                write!(
                    f,
                    "rule for field '{}' must name its operator as a string",
                    field
                )
            }
            FilterError::UnknownOperator { field, operator } => {
                write!(f, "unsupported operator '{}' for field '{}'", operator, field)
            }
            FilterError::TypeMismatch {
                field,
                operator,
                expected,
            } => {
                write!(
                    f,
                    "operator '{}' on field '{}' requires {}",
                    operator, field, expected
                )
            }
        }
    }
}

impl std::error::Error for FilterError {}

// =============================================================================
// Schema Errors
// =============================================================================

/// Errors raised while validating a raw response payload into a typed page
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// A required field was absent from the payload
    MissingField {
        key: String,
    },

    /// A field was present but could not be read as the expected shape
    InvalidField {
        key: String,
        message: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::MissingField { key } => {
                write!(f, "response payload is missing required field '{}'", key)
            }
            SchemaError::InvalidField { key, message } => {
                write!(f, "response field '{}' is invalid: {}", key, message)
            }
        }
    }
}

impl std::error::Error for SchemaError {}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse a configuration document
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// A configuration value is outside its allowed range
    InvalidValue {
        field: String,
        message: String,
    },

    /// IO error while reading configuration
    IoError {
        message: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue { field, message } => {
                write!(f, "invalid value for '{}': {}", field, message)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
