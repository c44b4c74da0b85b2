//! Shared test harness for list coordination testing
//!
//! Provides `ScriptedFetcher`, a programmable backend whose delays,
//! failures, and served content are controlled from the test body, plus
//! a snapshot of every request it answered.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod support;
//! use support::*;
//! ```

#![allow(dead_code)]

use anyhow::{Result, bail};
use async_trait::async_trait;
use relist::core::fetcher::PageFetcher;
use relist::core::page::{PageRequest, PageResponse};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A backend scripted by the test body.
///
/// Serves `vec![version]` as the rows of every data page and `version`
/// as every count, so a settled refresh can be checked for mixing
/// results across invocations: after any single refresh, row and count
/// must carry the same version.
#[derive(Clone, Default)]
pub struct ScriptedFetcher {
    /// Version stamped into rows and counts; bump between refreshes
    pub version: Arc<AtomicU64>,
    /// Sleep before answering a data request, in milliseconds
    pub data_delay_ms: Arc<AtomicU64>,
    /// Sleep before answering a count request, in milliseconds
    pub count_delay_ms: Arc<AtomicU64>,
    /// Fail data requests with "backend down"
    pub fail_data: Arc<AtomicBool>,
    /// Fail count requests with "backend down"
    pub fail_count: Arc<AtomicBool>,
    /// Number of data requests answered (including failures)
    pub data_calls: Arc<AtomicUsize>,
    /// Number of count requests answered (including failures)
    pub count_calls: Arc<AtomicUsize>,
    /// Every request seen, in arrival order
    pub requests: Arc<Mutex<Vec<PageRequest>>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        let fetcher = Self::default();
        fetcher.version.store(1, Ordering::SeqCst);
        fetcher
    }

    pub fn set_version(&self, version: u64) {
        self.version.store(version, Ordering::SeqCst);
    }

    pub fn set_delays(&self, data_ms: u64, count_ms: u64) {
        self.data_delay_ms.store(data_ms, Ordering::SeqCst);
        self.count_delay_ms.store(count_ms, Ordering::SeqCst);
    }

    pub fn total_calls(&self) -> usize {
        self.data_calls.load(Ordering::SeqCst) + self.count_calls.load(Ordering::SeqCst)
    }

    pub fn recorded_requests(&self) -> Vec<PageRequest> {
        self.requests.lock().expect("request log poisoned").clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    type Row = u64;
    type Overview = Value;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse<u64, Value>> {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request.clone());

        let (calls, delay, fail) = if request.count {
            (&self.count_calls, &self.count_delay_ms, &self.fail_count)
        } else {
            (&self.data_calls, &self.data_delay_ms, &self.fail_data)
        };
        calls.fetch_add(1, Ordering::SeqCst);

        let delay = delay.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if fail.load(Ordering::SeqCst) {
            bail!("backend down");
        }

        let version = self.version.load(Ordering::SeqCst);
        if request.count {
            Ok(PageResponse::of_count(version))
        } else {
            Ok(PageResponse::of_rows(vec![version])
                .with_overview(json!({"version": version})))
        }
    }
}
