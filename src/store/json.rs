//! Fetcher over raw JSON payloads
//!
//! HTTP-style backends answer with loosely-shaped JSON whose field names
//! vary per endpoint. [`JsonFetcher`] wraps an async closure producing
//! such payloads and validates them into typed [`PageResponse`]s at the
//! boundary, using the configured [`ResponseKeys`].

use crate::config::ResponseKeys;
use crate::core::fetcher::PageFetcher;
use crate::core::page::{PageRequest, PageResponse};
use anyhow::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

/// The wrapped transport callback
pub type JsonFetchFn = dyn Fn(PageRequest) -> BoxFuture<'static, Result<Value>> + Send + Sync;

/// Page fetcher adapting raw JSON payloads into typed responses
///
/// # Example
/// ```rust,ignore
/// let fetcher: JsonFetcher<Host, Overview> = JsonFetcher::new(move |request| {
///     let client = client.clone();
///     Box::pin(async move { client.post("/hosts/query").json(&request).send().await })
/// });
/// ```
pub struct JsonFetcher<T, O> {
    fetch: Box<JsonFetchFn>,
    keys: ResponseKeys,
    _marker: PhantomData<fn() -> (T, O)>,
}

impl<T, O> JsonFetcher<T, O> {
    /// Wrap a transport callback, reading payloads with the default keys
    pub fn new<F>(fetch: F) -> Self
    where
        F: Fn(PageRequest) -> BoxFuture<'static, Result<Value>> + Send + Sync + 'static,
    {
        Self::with_keys(fetch, ResponseKeys::default())
    }

    /// Wrap a transport callback with explicit payload field names
    pub fn with_keys<F>(fetch: F, keys: ResponseKeys) -> Self
    where
        F: Fn(PageRequest) -> BoxFuture<'static, Result<Value>> + Send + Sync + 'static,
    {
        Self {
            fetch: Box::new(fetch),
            keys,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T, O> PageFetcher for JsonFetcher<T, O>
where
    T: DeserializeOwned + Send + Sync,
    O: DeserializeOwned + Send + Sync,
{
    type Row = T;
    type Overview = O;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse<T, O>> {
        let payload = (self.fetch)(request.clone()).await?;
        let response = if request.count {
            PageResponse::count_from_value(&payload, &self.keys)?
        } else {
            PageResponse::data_from_value(&payload, &self.keys)?
        };
        Ok(response)
    }
}
