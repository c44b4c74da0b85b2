//! The injected page-fetching dependency
//!
//! [`PageFetcher`] is the only outward boundary of the crate: the list
//! coordinator is agnostic to where rows come from (an HTTP API, a
//! database, an in-memory store) and only requires that the backend
//! answers [`PageRequest`]s.

use crate::core::page::{PageRequest, PageResponse};
use anyhow::Result;
use async_trait::async_trait;

/// Backend for a paged list view
///
/// One refresh calls `fetch_page` twice: once with `count == false` for
/// the row window (optionally carrying an overview aggregate) and once
/// with `count == true` for the filtered total.
///
/// Errors are propagated to the coordinator's caller unchanged; the
/// coordinator never classifies, wraps, or retries them.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Row type of the list
    type Row: Send + Sync;

    /// Aggregate returned alongside a data page, if the backend has one
    type Overview: Send + Sync;

    /// Answer one page or count request
    async fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> Result<PageResponse<Self::Row, Self::Overview>>;
}
