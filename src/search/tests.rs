//! Search controller tests
//!
//! Drives the controller with a scripted backend whose answers and delays are
//! fixed per call, so ordering races can be reproduced on paused tokio time.

#[cfg(test)]
mod tests {
    use crate::error::ApiError;
    use crate::listing::SortMode;
    use crate::models::{Address, PackageTier, PostRecord, SearchResponse};
    use crate::query::{History, ParamDelta, QueryParams, QueryState};
    use crate::search::{
        FetchState, SearchBackend, SearchController, SearchOutcome, SearchRequest,
    };
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::mpsc;

    type Scripted = (Duration, Result<SearchResponse, ApiError>);

    struct ScriptedBackend {
        script: Mutex<VecDeque<Scripted>>,
        requests: Mutex<Vec<SearchRequest>>,
        notify: Option<mpsc::UnboundedSender<SearchRequest>>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Scripted>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
                notify: None,
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SearchBackend for ScriptedBackend {
        async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(tx) = &self.notify {
                let _ = tx.send(request.clone());
            }
            let next = self.script.lock().unwrap().pop_front();
            let (delay, result) = next.unwrap_or((
                Duration::ZERO,
                Ok(SearchResponse {
                    posts: vec![],
                    total: 0,
                }),
            ));
            tokio::time::sleep(delay).await;
            result
        }

        fn backend_name(&self) -> &'static str {
            "scripted"
        }
    }

    fn post(id: &str, package: Option<PackageTier>, price: i64, day: u32) -> PostRecord {
        PostRecord {
            id: id.to_string(),
            title: format!("Tin {id}"),
            description: String::new(),
            price,
            area: 20.0,
            address: Address::default(),
            images: vec![],
            package_type: package,
            property_type: None,
            room_id: None,
            is_available: true,
            created_at: Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).unwrap(),
        }
    }

    fn response(posts: Vec<PostRecord>) -> Result<SearchResponse, ApiError> {
        let total = posts.len() as u64;
        Ok(SearchResponse { posts, total })
    }

    fn ids(items: &[crate::models::SearchResultItem]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    fn controller(script: Vec<Scripted>) -> SearchController<ScriptedBackend> {
        SearchController::new(ScriptedBackend::new(script), Duration::from_secs(10), 2)
    }

    #[tokio::test]
    async fn test_empty_query_requests_available_only() {
        let controller = controller(vec![]);
        controller.on_query_change(&QueryParams::new()).await;

        let requests = controller.backend().requests.lock().unwrap().clone();
        assert_eq!(
            serde_json::to_value(&requests[0]).unwrap(),
            json!({ "isAvailable": true })
        );
    }

    #[tokio::test]
    async fn test_empty_result_is_distinct_from_failure() {
        let controller = controller(vec![(Duration::ZERO, response(vec![]))]);
        let outcome = controller
            .on_query_change(&QueryParams::parse("district=Qu%E1%BA%ADn%209"))
            .await;

        assert_eq!(outcome, SearchOutcome::Applied);
        assert_eq!(controller.state(), FetchState::Empty);
        assert!(controller.visible_items().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_does_not_overwrite_newer() {
        let controller = controller(vec![
            (Duration::from_secs(5), response(vec![post("old", None, 1, 1)])),
            (Duration::from_millis(10), response(vec![post("new", None, 1, 1)])),
        ]);

        let cheap = QueryParams::parse("minRent=0");
        let first = controller.on_query_change(&cheap);
        let second = async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            controller
                .on_query_change(&QueryParams::parse("minRent=7000000"))
                .await
        };
        let (first, second) = tokio::join!(first, second);

        assert_ne!(first, SearchOutcome::Applied);
        assert_eq!(second, SearchOutcome::Applied);
        assert_eq!(ids(&controller.visible_items()), vec!["new"]);

        // Let the slow backend call run out; state must not change
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(ids(&controller.visible_items()), vec!["new"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_retryable_failure() {
        let controller = controller(vec![(
            Duration::from_secs(60),
            response(vec![post("late", None, 1, 1)]),
        )]);
        controller.on_query_change(&QueryParams::new()).await;

        match controller.state() {
            FetchState::Failed { message, retryable } => {
                assert!(retryable);
                assert!(message.contains("timed out"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_clears_previous_results_and_retry_recovers() {
        let controller = controller(vec![
            (Duration::ZERO, response(vec![post("a", None, 1, 1)])),
            (Duration::ZERO, Err(ApiError::Network("connection reset".into()))),
            (Duration::ZERO, response(vec![post("b", None, 1, 1)])),
        ]);

        controller.on_query_change(&QueryParams::new()).await;
        assert_eq!(ids(&controller.visible_items()), vec!["a"]);

        controller
            .on_query_change(&QueryParams::parse("propertyType=HOUSE"))
            .await;
        assert!(controller.visible_items().is_empty());
        assert!(matches!(
            controller.state(),
            FetchState::Failed {
                retryable: true,
                ..
            }
        ));

        controller.retry().await;
        assert_eq!(ids(&controller.visible_items()), vec!["b"]);
        let requests = controller.backend().requests.lock().unwrap().clone();
        assert_eq!(requests[1], requests[2]);
    }

    #[tokio::test]
    async fn test_missing_resource_offers_retry() {
        let controller = controller(vec![(
            Duration::ZERO,
            Err(ApiError::NotFound {
                resource: "search",
                id: "district=Qu%E1%BA%ADn%2012".into(),
            }),
        )]);
        controller
            .on_query_change(&QueryParams::parse("district=Qu%E1%BA%ADn%2012"))
            .await;

        assert!(matches!(
            controller.state(),
            FetchState::Failed {
                retryable: true,
                ..
            }
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_searches_leave_latest_params() {
        let controller = Arc::new(controller(vec![]));

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let controller = Arc::clone(&controller);
                tokio::spawn(async move {
                    let params = QueryParams::parse(&format!("minRent={i}"));
                    let outcome = controller.on_query_change(&params).await;
                    (params, outcome)
                })
            })
            .collect();

        let mut applied = Vec::new();
        for handle in handles {
            let (params, outcome) = handle.await.unwrap();
            if outcome == SearchOutcome::Applied {
                applied.push(params);
            }
        }

        // The retained params always belong to a search whose result was kept
        assert!(!controller.state().is_loading());
        assert!(applied.contains(&controller.params()));
    }

    #[tokio::test]
    async fn test_sort_change_reorders_without_refetch() {
        let controller = controller(vec![(
            Duration::ZERO,
            response(vec![
                post("thuong-cheap", Some(PackageTier::Thuong), 1_000_000, 3),
                post("none", None, 500_000, 9),
                post("vip1", Some(PackageTier::Vip1), 9_000_000, 1),
                post("thuong-pricey", Some(PackageTier::Thuong), 4_000_000, 8),
            ]),
        )]);
        controller.on_query_change(&QueryParams::new()).await;

        // Two per page
        assert_eq!(ids(&controller.visible_items()), vec!["vip1", "thuong-cheap"]);

        controller.set_sort(SortMode::Newest);
        assert_eq!(ids(&controller.visible_items()), vec!["vip1", "thuong-pricey"]);

        controller.set_sort(SortMode::Default);
        assert_eq!(ids(&controller.visible_items()), vec!["vip1", "thuong-cheap"]);
        assert_eq!(controller.backend().request_count(), 1);
    }

    #[tokio::test]
    async fn test_page_param_selects_window() {
        let posts = (1..=5).map(|i| post(&format!("p{i}"), None, i, 1)).collect();
        let controller = controller(vec![(Duration::ZERO, response(posts))]);
        controller
            .on_query_change(&QueryParams::parse("page=3"))
            .await;

        assert_eq!(ids(&controller.visible_items()), vec!["p5"]);
        let pagination = controller.pagination();
        assert_eq!(pagination.current_page(), 3);
        assert_eq!(pagination.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_out_of_range_page_is_clamped() {
        let posts = (1..=3).map(|i| post(&format!("p{i}"), None, i, 1)).collect();
        let controller = controller(vec![(Duration::ZERO, response(posts))]);
        controller
            .on_query_change(&QueryParams::parse("page=40"))
            .await;

        assert_eq!(controller.pagination().current_page(), 2);
        assert_eq!(ids(&controller.visible_items()), vec!["p3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_view_cancels_in_flight() {
        let controller = controller(vec![(
            Duration::from_secs(5),
            response(vec![post("x", None, 1, 1)]),
        )]);

        let params = QueryParams::new();
        let search = controller.on_query_change(&params);
        let leave = async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            controller.cancel();
        };
        let (outcome, _) = tokio::join!(search, leave);

        assert_eq!(outcome, SearchOutcome::Cancelled);
        assert_eq!(controller.state(), FetchState::Idle);
    }

    #[tokio::test]
    async fn test_follow_searches_on_every_query_change() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut backend = ScriptedBackend::new(vec![]);
        backend.notify = Some(tx);
        let controller = Arc::new(SearchController::new(backend, Duration::from_secs(10), 10));

        let state = QueryState::new(History::new());
        let follower = tokio::spawn(Arc::clone(&controller).follow(state.subscribe()));

        let initial = rx.recv().await.unwrap();
        assert_eq!(initial.get("isAvailable"), Some(&json!(true)));

        state.apply_params(&ParamDelta::new().set("maxSize", 30));
        let filtered = rx.recv().await.unwrap();
        assert_eq!(filtered.get("maxSize"), Some(&json!(30)));

        drop(state);
        follower.await.unwrap();
    }
}
