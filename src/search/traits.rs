use crate::error::ApiError;
use crate::models::SearchResponse;
use crate::search::request::SearchRequest;
use async_trait::async_trait;

/// Anything that can answer a listing search.
/// The HTTP client implements it; tests swap in scripted backends.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError>;

    fn backend_name(&self) -> &'static str;
}
