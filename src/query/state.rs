use crate::filters::FilterSelection;
use crate::query::params::{ParamDelta, QueryParams};
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::debug;

/// Route of the search page
pub const SEARCH_ROUTE: &str = "/search";

/// Something that can move the user to another location (router, browser history, test double)
pub trait Navigator: Send + Sync {
    fn navigate(&self, location: &str);
}

/// In-memory history stack with back navigation
#[derive(Debug, Default)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<String> {
        self.entries.lock().ok()?.last().cloned()
    }

    /// Pop the current entry and return the one now on top
    pub fn back(&self) -> Option<String> {
        let mut entries = self.entries.lock().ok()?;
        if entries.len() < 2 {
            return None;
        }
        entries.pop();
        entries.last().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Navigator for History {
    fn navigate(&self, location: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(location.to_string());
        }
    }
}

/// Build `/search?<query>`, or bare `/search` when there are no params
pub fn search_location(params: &QueryParams) -> String {
    if params.is_empty() {
        SEARCH_ROUTE.to_string()
    } else {
        format!("{}?{}", SEARCH_ROUTE, params.to_query_string())
    }
}

/// Owner of the search URL's query parameters.
///
/// Active filters are always derived from the stored params, never cached
/// separately, so loading a URL directly or going back in history gives the
/// same filter UI as clicking through the widgets.
pub struct QueryState<N: Navigator> {
    navigator: N,
    params: watch::Sender<QueryParams>,
}

impl<N: Navigator> QueryState<N> {
    pub fn new(navigator: N) -> Self {
        let (params, _) = watch::channel(QueryParams::new());
        Self { navigator, params }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn params(&self) -> QueryParams {
        self.params.borrow().clone()
    }

    pub fn query_string(&self) -> String {
        self.params.borrow().to_query_string()
    }

    pub fn filters(&self) -> FilterSelection {
        FilterSelection::from_params(&self.params.borrow())
    }

    /// Watch for query changes; the search controller re-runs on every change
    pub fn subscribe(&self) -> watch::Receiver<QueryParams> {
        self.params.subscribe()
    }

    /// Merge `delta` into the current params and navigate to the resulting search URL
    pub fn apply_params(&self, delta: &ParamDelta) -> QueryParams {
        let next = self.params.borrow().merged(delta);
        let location = search_location(&next);
        debug!("Navigating to {}", location);
        self.navigator.navigate(&location);
        self.params.send_replace(next.clone());
        next
    }

    /// Sync state from a location reached without `apply_params` (direct load, back/forward)
    pub fn load_location(&self, location: &str) {
        let query = location.split_once('?').map(|(_, q)| q).unwrap_or("");
        let params = QueryParams::parse(query);
        self.params.send_if_modified(|current| {
            if *current == params {
                false
            } else {
                *current = params;
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{select_bucket, Axis, RangeAxis, PRICE_BUCKETS};
    use crate::query::params::PAGE_KEY;

    #[test]
    fn test_apply_params_navigates_with_merged_query() {
        let state = QueryState::new(History::new());
        state.apply_params(&ParamDelta::new().set("district", "Cầu Giấy"));
        state.apply_params(&ParamDelta::new().set("minRent", 0).remove(PAGE_KEY));

        let params = state.params();
        assert_eq!(params.get("district"), Some("Cầu Giấy"));
        assert_eq!(params.get("minRent"), Some("0"));

        let current = state.navigator().current().unwrap();
        assert!(current.starts_with("/search?"));
        assert_eq!(state.navigator().len(), 2);
    }

    #[test]
    fn test_empty_value_removes_key_from_url() {
        let state = QueryState::new(History::new());
        state.apply_params(&ParamDelta::new().set("district", "Quận 7"));
        state.apply_params(&ParamDelta::new().set("district", ""));

        assert!(state.params().is_empty());
        assert_eq!(state.navigator().current().as_deref(), Some("/search"));
    }

    #[test]
    fn test_back_navigation_restores_filters() {
        let state = QueryState::new(History::new());
        let first = select_bucket(&state.params(), RangeAxis::Price, &PRICE_BUCKETS[0]);
        state.apply_params(&first);
        let second = select_bucket(&state.params(), RangeAxis::Price, &PRICE_BUCKETS[4]);
        state.apply_params(&second);
        assert_eq!(
            state.filters().get(Axis::Price).map(|s| s.display.as_str()),
            Some(PRICE_BUCKETS[4].label)
        );

        let previous = state.navigator().back().unwrap();
        state.load_location(&previous);
        assert_eq!(
            state.filters().get(Axis::Price).map(|s| s.display.as_str()),
            Some(PRICE_BUCKETS[0].label)
        );
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let state = QueryState::new(History::new());
        let mut rx = state.subscribe();

        state.apply_params(&ParamDelta::new().set("district", "Hoàn Kiếm"));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().get("district"), Some("Hoàn Kiếm"));

        // Reloading the same location is not a change
        state.load_location("/search?district=Ho%C3%A0n+Ki%E1%BA%BFm");
        assert!(!rx.has_changed().unwrap());
    }
}
