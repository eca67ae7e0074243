use crate::auth::SessionStore;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::SearchResponse;
use crate::search::{SearchBackend, SearchRequest};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// REST client for the VieStay backend.
///
/// Every request carries the session's bearer token when there is one. A 401
/// clears the session through [`SessionStore::handle_unauthorized`].
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
    pub(crate) upload_url: String,
    pub(crate) upload_preset: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("viestay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs(),
            upload_url: config.upload_url.clone(),
            upload_preset: config.upload_preset.clone(),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GET `path` and decode the body as `T`
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
        resource: &'static str,
        id: &str,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!("GET {}", url);
        self.send(self.client.get(url).query(query), resource, id).await
    }

    /// Send an authorized request and decode the response
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        resource: &'static str,
        id: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .authorized(builder)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.timeout_secs))?;
        self.decode(response, resource, id).await
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: Response,
        resource: &'static str,
        id: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.session.handle_unauthorized();
            return Err(ApiError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                resource,
                id: id.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.timeout_secs))?;

        if !status.is_success() {
            warn!("{} request returned {}", resource, status);
            return Err(ApiError::from_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(format!("{resource}: {e}")))
    }
}

#[async_trait]
impl SearchBackend for ApiClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError> {
        self.get_json(
            "/api/posts/search",
            &request.to_query_pairs(),
            "search",
            "",
        )
        .await
    }

    fn backend_name(&self) -> &'static str {
        "VieStay API"
    }
}
