//! Paging primitives: requests, pagination state, and typed responses
//!
//! A refresh of a list view issues two [`PageRequest`]s — one for the
//! current window of rows and one for the total count — and applies both
//! results to a [`Pagination`] plus a row buffer. Backends answer with a
//! [`PageResponse`], either built directly or adapted from a raw JSON
//! payload via the key-configurable helpers.

use crate::config::ResponseKeys;
use crate::core::error::SchemaError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sort direction for a list query
///
/// Serializes as `"ASC"` / `"DESC"`, the form backends receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One request against a paged backend
///
/// `count == false` asks for a window of rows starting at `start`;
/// `count == true` asks only for the total row count, with the paging
/// fields carried along but ignored by the backend.
///
/// # Example
/// ```rust,ignore
/// // Second page of 20, newest first:
/// let request = PageRequest::data(20, 20, Some("created_at".into()), Some(SortOrder::Desc));
/// let totals = PageRequest::count_for(&request);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRequest {
    /// Zero-based offset of the first row
    pub start: u64,

    /// Number of rows requested
    pub limit: u64,

    /// Field to sort by, when a sort has been applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,

    /// Sort direction, when a sort has been applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,

    /// Whether this request asks for the total count instead of rows
    pub count: bool,
}

impl PageRequest {
    /// Build a data-page request
    pub fn data(start: u64, limit: u64, sort: Option<String>, order: Option<SortOrder>) -> Self {
        Self {
            start,
            limit,
            sort,
            order,
            count: false,
        }
    }

    /// Build a bare count request
    pub fn count_only() -> Self {
        Self {
            start: 0,
            limit: 0,
            sort: None,
            order: None,
            count: true,
        }
    }

    /// Build the count request paired with a data request
    ///
    /// Carries the same sort/limit context so both halves of one refresh
    /// describe the same query; backends ignore paging for counts.
    pub fn count_for(data: &PageRequest) -> Self {
        Self {
            count: true,
            ..data.clone()
        }
    }
}

/// Pagination state of one list view
///
/// `current` starts at 1; `count` is the backend's total after filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (starts at 1)
    pub current: u64,

    /// Number of rows per page
    pub limit: u64,

    /// Total number of rows (after filters)
    pub count: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current: 1,
            limit: 10,
            count: 0,
        }
    }
}

impl Pagination {
    /// Zero-based offset of the first row on the current page
    pub fn start_offset(&self) -> u64 {
        self.current.saturating_sub(1) * self.limit
    }

    /// Total number of pages
    pub fn total_pages(&self) -> u64 {
        // Guard the division; limit 0 would otherwise panic
        let limit = self.limit.max(1);
        if self.count == 0 {
            0
        } else {
            self.count.div_ceil(limit)
        }
    }

    /// Whether a page exists after the current one
    pub fn has_next(&self) -> bool {
        self.start_offset() + self.limit < self.count
    }

    /// Whether a page exists before the current one
    pub fn has_prev(&self) -> bool {
        self.current > 1
    }
}

/// Typed result of one backend request
///
/// A data request populates `rows` (and optionally `overview`, an
/// aggregate returned alongside the list); a count request populates
/// `count`. Fields the request did not ask for are left empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse<T, O> {
    /// The rows of the requested window
    pub rows: Vec<T>,

    /// Optional aggregate/summary returned with the rows
    pub overview: Option<O>,

    /// Total row count, for count requests
    pub count: Option<u64>,
}

impl<T, O> PageResponse<T, O> {
    /// Response to a data request
    pub fn of_rows(rows: Vec<T>) -> Self {
        Self {
            rows,
            overview: None,
            count: None,
        }
    }

    /// Attach an overview aggregate
    pub fn with_overview(mut self, overview: O) -> Self {
        self.overview = Some(overview);
        self
    }

    /// Response to a count request
    pub fn of_count(count: u64) -> Self {
        Self {
            rows: Vec::new(),
            overview: None,
            count: Some(count),
        }
    }
}

impl<T, O> PageResponse<T, O>
where
    T: DeserializeOwned,
    O: DeserializeOwned,
{
    /// Validate a raw data-request payload into a typed response
    ///
    /// The list field is required and must be an array; the overview field
    /// is optional. Field names come from [`ResponseKeys`].
    pub fn data_from_value(payload: &Value, keys: &ResponseKeys) -> Result<Self, SchemaError> {
        let list = payload.get(&keys.list).ok_or_else(|| SchemaError::MissingField {
            key: keys.list.clone(),
        })?;
        let rows: Vec<T> =
            serde_json::from_value(list.clone()).map_err(|e| SchemaError::InvalidField {
                key: keys.list.clone(),
                message: e.to_string(),
            })?;

        let overview = match payload.get(&keys.overview) {
            None | Some(Value::Null) => None,
            Some(raw) => Some(serde_json::from_value(raw.clone()).map_err(|e| {
                SchemaError::InvalidField {
                    key: keys.overview.clone(),
                    message: e.to_string(),
                }
            })?),
        };

        Ok(Self {
            rows,
            overview,
            count: payload.get(&keys.count).and_then(Value::as_u64),
        })
    }

    /// Validate a raw count-request payload into a typed response
    ///
    /// The count field is required and must be a non-negative integer;
    /// any list/overview content is ignored.
    pub fn count_from_value(payload: &Value, keys: &ResponseKeys) -> Result<Self, SchemaError> {
        let raw = payload.get(&keys.count).ok_or_else(|| SchemaError::MissingField {
            key: keys.count.clone(),
        })?;
        let count = raw.as_u64().ok_or_else(|| SchemaError::InvalidField {
            key: keys.count.clone(),
            message: format!("expected a non-negative integer, got {}", raw),
        })?;
        Ok(Self::of_count(count))
    }
}
