//! # Relist
//!
//! A coordinator for remote paginated list views.
//!
//! ## Features
//!
//! - **Paged List Coordination**: pagination, sorting, and loading state
//!   owned in one place, refetched through an injected backend
//! - **Dual Fetching**: the row window and the total count are requested
//!   concurrently and applied together, so a view never mixes them
//! - **Compact Filter Conditions**: `["AND", [field, op, value], ...]`
//!   arrays validated into a structured filter tree
//! - **Typed Response Boundary**: raw JSON payloads validated into typed
//!   pages at the fetcher boundary, with configurable field names
//! - **Backends Included**: an in-memory fetcher with full filter
//!   evaluation, and a JSON adapter for HTTP-style transports
//! - **Explicit Caching**: an optional caller-owned page cache with
//!   explicit invalidation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relist::prelude::*;
//! use serde_json::json;
//!
//! // A filter, written compactly and validated up front
//! let filter = from_conditions(&json!([
//!     "AND",
//!     ["status", "=", "running"],
//!     ["cpu", ">=", 4],
//! ]))?;
//!
//! // A backend; anything implementing PageFetcher works
//! let fetcher = MemoryFetcher::new(rows).with_filter(filter);
//!
//! // The coordinator drives the view
//! let query = ListQuery::new(fetcher);
//! query.refresh().await?;
//! query.sort_by("created_at", SortOrder::Desc).await?;
//! query.set_page(2).await?;
//!
//! for row in query.rows()? {
//!     println!("{row:?}");
//! }
//! ```

pub mod cache;
pub mod config;
pub mod core;
pub mod filter;
pub mod list;
pub mod store;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ConfigError, FilterError, SchemaError},
        fetcher::PageFetcher,
        page::{PageRequest, PageResponse, Pagination, SortOrder},
    };

    // === Filters ===
    pub use crate::filter::{
        Condition, ConditionParser, FilterGroup, FilterNode, FilterRule, Operator,
        from_conditions,
    };

    // === Coordination ===
    pub use crate::list::{ListQuery, ListState};

    // === Backends ===
    pub use crate::store::{JsonFetcher, MemoryFetcher};

    // === Caching ===
    pub use crate::cache::{CachedPage, PageCache, cache_key};

    // === Config ===
    pub use crate::config::{ListConfig, ResponseKeys};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
}
