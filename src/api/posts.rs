use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{PostRecord, RoomRecord, SearchResultItem};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PostList {
    posts: Vec<PostRecord>,
}

#[derive(Debug, Deserialize)]
struct RoomList {
    rooms: Vec<RoomRecord>,
}

impl ApiClient {
    /// `GET /api/posts`
    pub async fn list_posts(&self) -> Result<Vec<SearchResultItem>, ApiError> {
        let list: PostList = self.get_json("/api/posts", &[], "posts", "").await?;
        Ok(list.posts.into_iter().map(SearchResultItem::from).collect())
    }

    /// `GET /api/posts/featured`
    pub async fn featured_posts(&self) -> Result<Vec<SearchResultItem>, ApiError> {
        let list: PostList = self
            .get_json("/api/posts/featured", &[], "featured posts", "")
            .await?;
        Ok(list.posts.into_iter().map(SearchResultItem::from).collect())
    }

    /// `GET /api/posts/{id}`
    pub async fn get_post(&self, id: &str) -> Result<PostRecord, ApiError> {
        self.get_json(&format!("/api/posts/{id}"), &[], "post", id)
            .await
    }

    /// `GET /rooms`
    pub async fn list_rooms(&self) -> Result<Vec<RoomRecord>, ApiError> {
        let list: RoomList = self.get_json("/rooms", &[], "rooms", "").await?;
        Ok(list.rooms)
    }

    /// `GET /rooms/{id}`
    pub async fn get_room(&self, id: &str) -> Result<RoomRecord, ApiError> {
        self.get_json(&format!("/rooms/{id}"), &[], "room", id).await
    }

    /// `GET /rooms/search?<query>`, same parameter vocabulary as post search
    pub async fn search_rooms(
        &self,
        request: &crate::search::SearchRequest,
    ) -> Result<Vec<SearchResultItem>, ApiError> {
        let list: RoomList = self
            .get_json("/rooms/search", &request.to_query_pairs(), "rooms", "")
            .await?;
        Ok(list.rooms.into_iter().map(SearchResultItem::from).collect())
    }

    /// `GET /rooms/accommodation/{id}`
    pub async fn rooms_for_accommodation(
        &self,
        accommodation_id: &str,
    ) -> Result<Vec<RoomRecord>, ApiError> {
        let list: RoomList = self
            .get_json(
                &format!("/rooms/accommodation/{accommodation_id}"),
                &[],
                "accommodation",
                accommodation_id,
            )
            .await?;
        Ok(list.rooms)
    }
}
