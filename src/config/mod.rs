//! Configuration loading and management

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

fn default_list_key() -> String {
    "details".to_string()
}

fn default_overview_key() -> String {
    "overview".to_string()
}

fn default_count_key() -> String {
    "count".to_string()
}

fn default_limit() -> u64 {
    10
}

/// Field names a raw backend payload is read with
///
/// Backends differ in what they call the row list and its companions;
/// the adapters in [`PageResponse`](crate::core::PageResponse) and the
/// JSON fetcher read whichever names are configured here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseKeys {
    /// Field holding the row list
    #[serde(default = "default_list_key")]
    pub list: String,

    /// Field holding the optional overview aggregate
    #[serde(default = "default_overview_key")]
    pub overview: String,

    /// Field holding the total row count
    #[serde(default = "default_count_key")]
    pub count: String,
}

impl Default for ResponseKeys {
    fn default() -> Self {
        Self {
            list: default_list_key(),
            overview: default_overview_key(),
            count: default_count_key(),
        }
    }
}

/// Per-instance configuration for a list query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Field names for raw payload adaptation
    #[serde(default)]
    pub keys: ResponseKeys,

    /// Page size a freshly created or reset view uses
    #[serde(default = "default_limit")]
    pub default_limit: u64,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            keys: ResponseKeys::default(),
            default_limit: default_limit(),
        }
    }
}

impl ListConfig {
    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_limit".to_string(),
                message: "page size must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
