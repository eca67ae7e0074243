use crate::error::ApiError;
use crate::listing::{sort_items, Pagination, SortMode};
use crate::models::SearchResultItem;
use crate::query::QueryParams;
use crate::search::request::build_request;
use crate::search::sequencer::SearchSequencer;
use crate::search::traits::SearchBackend;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Renderable state of a page-level fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    /// Request succeeded with nothing to show
    Empty,
    Ready(T),
    Failed { message: String, retryable: bool },
}

impl<T> FetchState<T> {
    pub fn failed(error: &ApiError) -> Self {
        FetchState::Failed {
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}

/// Results of one search, in server order
#[derive(Debug, Clone, PartialEq)]
pub struct ResultBatch {
    pub items: Vec<SearchResultItem>,
    /// Total reported by the server
    pub total: u64,
}

/// What happened to a search once it finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Applied,
    /// A newer search was issued; the response was thrown away
    Superseded,
    /// Cancelled before the backend answered
    Cancelled,
}

#[derive(Debug)]
struct SearchView {
    fetch: FetchState<ResultBatch>,
    sort: SortMode,
    page: u32,
    params: QueryParams,
}

/// Drives the search page: fetches on every query change, keeps only the
/// latest response, and serves sorted page slices from memory.
pub struct SearchController<B: SearchBackend> {
    backend: B,
    sequencer: SearchSequencer,
    timeout: Duration,
    per_page: usize,
    view: Mutex<SearchView>,
}

impl<B: SearchBackend> SearchController<B> {
    pub fn new(backend: B, timeout: Duration, per_page: usize) -> Self {
        Self {
            backend,
            sequencer: SearchSequencer::new(),
            timeout,
            per_page: per_page.max(1),
            view: Mutex::new(SearchView {
                fetch: FetchState::Idle,
                sort: SortMode::Default,
                page: 1,
                params: QueryParams::new(),
            }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn view(&self) -> MutexGuard<'_, SearchView> {
        self.view.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fetch results for `params`, replacing the current batch if this is still the latest search
    pub async fn on_query_change(&self, params: &QueryParams) -> SearchOutcome {
        let request = build_request(params);
        // Issue under the view lock so an older search can never write Loading
        // or its params over a newer one
        let ticket = {
            let mut view = self.view();
            let ticket = self.sequencer.issue();
            view.fetch = FetchState::Loading;
            view.params = params.clone();
            view.page = params.page();
            ticket
        };
        info!(
            "Search #{} on {} with {} params",
            ticket.seq(),
            self.backend.backend_name(),
            request.len()
        );

        let result = tokio::select! {
            _ = ticket.cancelled() => {
                debug!("Search #{} cancelled", ticket.seq());
                return SearchOutcome::Cancelled;
            }
            result = tokio::time::timeout(self.timeout, self.backend.search(&request)) => result,
        };

        let mut view = self.view();
        if !self.sequencer.is_latest(&ticket) {
            debug!("Dropping stale response for search #{}", ticket.seq());
            return SearchOutcome::Superseded;
        }

        view.fetch = match result {
            Err(_) => {
                warn!("Search #{} timed out after {:?}", ticket.seq(), self.timeout);
                FetchState::failed(&ApiError::Timeout(self.timeout.as_secs()))
            }
            Ok(Err(e)) => {
                warn!("Search #{} failed: {}", ticket.seq(), e);
                FetchState::failed(&e)
            }
            Ok(Ok(response)) => {
                let total = response.total;
                let items = response.into_items();
                info!("Search #{} returned {} of {} items", ticket.seq(), items.len(), total);
                if items.is_empty() {
                    FetchState::Empty
                } else {
                    FetchState::Ready(ResultBatch { items, total })
                }
            }
        };
        SearchOutcome::Applied
    }

    /// Re-run the last search, e.g. from the retry button
    pub async fn retry(&self) -> SearchOutcome {
        let params = self.view().params.clone();
        self.on_query_change(&params).await
    }

    /// Leave the search view: anything in flight is ignored
    pub fn cancel(&self) {
        self.sequencer.cancel_all();
        let mut view = self.view();
        if view.fetch.is_loading() {
            view.fetch = FetchState::Idle;
        }
    }

    /// Params of the most recently issued search; what `retry` re-sends
    pub fn params(&self) -> QueryParams {
        self.view().params.clone()
    }

    pub fn state(&self) -> FetchState<ResultBatch> {
        self.view().fetch.clone()
    }

    pub fn sort_mode(&self) -> SortMode {
        self.view().sort
    }

    /// Reorder the batch already in memory; never refetches
    pub fn set_sort(&self, mode: SortMode) {
        self.view().sort = mode;
    }

    pub fn pagination(&self) -> Pagination {
        let view = self.view();
        let fetched = match &view.fetch {
            FetchState::Ready(batch) => batch.items.len(),
            _ => 0,
        };
        Pagination::new(view.page, self.per_page, fetched)
    }

    /// Sorted items of the current page
    pub fn visible_items(&self) -> Vec<SearchResultItem> {
        let view = self.view();
        let FetchState::Ready(batch) = &view.fetch else {
            return Vec::new();
        };
        let mut items = batch.items.clone();
        sort_items(&mut items, view.sort);
        Pagination::new(view.page, self.per_page, items.len())
            .slice(&items)
            .to_vec()
    }
}

impl<B: SearchBackend + 'static> SearchController<B> {
    /// Search on every change of the watched query params until the sender goes away
    pub async fn follow(self: Arc<Self>, mut params: watch::Receiver<QueryParams>) {
        loop {
            let current = params.borrow_and_update().clone();
            let controller = Arc::clone(&self);
            tokio::spawn(async move {
                controller.on_query_change(&current).await;
            });
            if params.changed().await.is_err() {
                break;
            }
        }
        debug!("Query state dropped, cancelling searches");
        self.cancel();
    }
}
