//! Paged list coordination
//!
//! [`ListQuery`] drives one remote list view: it owns the view's
//! pagination, sort, and loading state, and (re)populates it through an
//! injected [`PageFetcher`]. Every refresh issues the data request and
//! the count request concurrently and applies both results in a single
//! state mutation, so rows and total always come from the same refresh.
//!
//! Handles are cheap to clone and share their state, which lets a view
//! read `is_loading` while another task runs the refresh. Overlapping
//! refreshes are not de-duplicated or cancelled: if two run at once, the
//! one that resolves last wins. Callers that need to prevent this
//! disable their controls while `is_loading` is set.

use crate::config::ListConfig;
use crate::core::fetcher::PageFetcher;
use crate::core::page::{PageRequest, Pagination, SortOrder};
use anyhow::{Result, anyhow};
use futures::future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// State of one list view
///
/// Mutated only by the owning [`ListQuery`]'s operations; views read it
/// through the accessors or [`ListQuery::snapshot`].
#[derive(Debug, Clone)]
pub struct ListState<T, O> {
    /// Rows of the current page
    pub rows: Vec<T>,

    /// Aggregate returned alongside the rows, if the backend sent one
    pub overview: Option<O>,

    /// Current page / page size / total
    pub pagination: Pagination,

    /// Whether a refresh is in flight
    pub is_loading: bool,

    /// Field the view is sorted by, once a sort has been applied
    pub sort: Option<String>,

    /// Sort direction, once a sort has been applied
    pub order: Option<SortOrder>,
}

impl<T, O> ListState<T, O> {
    fn new(limit: u64) -> Self {
        Self {
            rows: Vec::new(),
            overview: None,
            pagination: Pagination {
                limit,
                ..Pagination::default()
            },
            is_loading: false,
            sort: None,
            order: None,
        }
    }
}

/// Coordinator for one remote paginated list view
///
/// # Example
/// ```rust,ignore
/// let query = ListQuery::new(fetcher);
/// query.refresh().await?;              // first page + total
/// query.sort_by("created_at", SortOrder::Desc).await?;
/// query.set_page(3).await?;
/// println!("{} of {} rows", query.rows()?.len(), query.pagination()?.count);
/// ```
pub struct ListQuery<F: PageFetcher> {
    fetcher: Arc<F>,
    default_limit: u64,
    state: Arc<RwLock<ListState<F::Row, F::Overview>>>,
}

impl<F: PageFetcher> Clone for ListQuery<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            default_limit: self.default_limit,
            state: Arc::clone(&self.state),
        }
    }
}

impl<F: PageFetcher> ListQuery<F> {
    /// Create a coordinator with default configuration
    pub fn new(fetcher: F) -> Self {
        Self::with_config(fetcher, &ListConfig::default())
    }

    /// Create a coordinator with explicit configuration
    pub fn with_config(fetcher: F, config: &ListConfig) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            default_limit: config.default_limit,
            state: Arc::new(RwLock::new(ListState::new(config.default_limit))),
        }
    }

    /// Refetch the current page and the total count
    ///
    /// Both requests run concurrently; state is only touched once both
    /// have resolved. On failure the backend's error propagates unchanged
    /// and `is_loading` is still cleared — rows, overview, and count keep
    /// their previous values.
    pub async fn refresh(&self) -> Result<()> {
        let data_request = {
            let mut state = self.write()?;
            state.is_loading = true;
            PageRequest::data(
                state.pagination.start_offset(),
                state.pagination.limit,
                state.sort.clone(),
                state.order,
            )
        };
        let count_request = PageRequest::count_for(&data_request);

        let outcome = future::try_join(
            self.fetcher.fetch_page(&data_request),
            self.fetcher.fetch_page(&count_request),
        )
        .await;

        let mut state = self.write()?;
        match outcome {
            Ok((page, totals)) => {
                state.rows = page.rows;
                state.overview = page.overview;
                state.pagination.count = totals.count.unwrap_or(0);
                state.is_loading = false;
                Ok(())
            }
            Err(err) => {
                state.is_loading = false;
                Err(err)
            }
        }
    }

    /// Move to another page and refetch
    ///
    /// `page` is 1-based; callers offer only valid pages.
    pub async fn set_page(&self, page: u64) -> Result<()> {
        {
            self.write()?.pagination.current = page;
        }
        self.refresh().await
    }

    /// Change the page size and refetch
    ///
    /// The current page index is kept, matching how paging controls
    /// behave; with a larger size the resulting offset can point past the
    /// last row, in which case the backend returns an empty window.
    pub async fn set_page_size(&self, limit: u64) -> Result<()> {
        {
            self.write()?.pagination.limit = limit;
        }
        self.refresh().await
    }

    /// Sort by a field and refetch from the first page
    pub async fn sort_by(&self, field: impl Into<String>, order: SortOrder) -> Result<()> {
        {
            let mut state = self.write()?;
            state.pagination.current = 1;
            state.sort = Some(field.into());
            state.order = Some(order);
        }
        self.refresh().await
    }

    /// Reset pagination to the first page with the configured page size
    ///
    /// Leaves rows, sort, and order untouched and does not refetch on its
    /// own; combine with [`refresh`](Self::refresh) — or use
    /// [`search`](Self::search) — for a full reset-and-refetch.
    pub fn reset_pagination(&self) -> Result<()> {
        self.write()?.pagination = Pagination {
            current: 1,
            limit: self.default_limit,
            count: 0,
        };
        Ok(())
    }

    /// Reset pagination and refetch, as done when search criteria change
    pub async fn search(&self) -> Result<()> {
        self.reset_pagination()?;
        self.refresh().await
    }

    /// Whether a refresh is currently in flight
    pub fn is_loading(&self) -> Result<bool> {
        Ok(self.read()?.is_loading)
    }

    /// Current pagination state
    pub fn pagination(&self) -> Result<Pagination> {
        Ok(self.read()?.pagination)
    }

    /// Field the view is sorted by, if any
    pub fn sort(&self) -> Result<Option<String>> {
        Ok(self.read()?.sort.clone())
    }

    /// Sort direction, if any
    pub fn order(&self) -> Result<Option<SortOrder>> {
        Ok(self.read()?.order)
    }

    /// Rows of the current page
    pub fn rows(&self) -> Result<Vec<F::Row>>
    where
        F::Row: Clone,
    {
        Ok(self.read()?.rows.clone())
    }

    /// Overview aggregate of the current page, if any
    pub fn overview(&self) -> Result<Option<F::Overview>>
    where
        F::Overview: Clone,
    {
        Ok(self.read()?.overview.clone())
    }

    /// A copy of the full view state
    pub fn snapshot(&self) -> Result<ListState<F::Row, F::Overview>>
    where
        F::Row: Clone,
        F::Overview: Clone,
    {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ListState<F::Row, F::Overview>>> {
        self.state
            .read()
            .map_err(|e| anyhow!("failed to acquire state lock: {}", e))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ListState<F::Row, F::Overview>>> {
        self.state
            .write()
            .map_err(|e| anyhow!("failed to acquire state lock: {}", e))
    }
}
