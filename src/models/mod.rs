pub mod tiers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use tiers::{package_priority, Feature, PackageTier, PropertyType, NO_PACKAGE_PRIORITY};

/// Vietnamese street address, split the way the backend stores it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub ward: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub city: String,
}

impl Address {
    /// Non-empty parts joined for display, street first
    pub fn display_line(&self) -> String {
        [&self.street, &self.ward, &self.district, &self.city]
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Discriminant of a search result. Drives card variant and navigation target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemKind {
    /// Directly bookable room
    Room,
    /// Contact-only listing, optionally pointing at a bookable room
    Post { room_id: Option<String> },
}

/// One entry in a result list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResultItem {
    pub id: String,
    #[serde(flatten)]
    pub kind: ItemKind,
    pub title: String,
    /// Monthly rent in VND
    pub price: i64,
    /// Floor area in m²
    pub area: f64,
    pub address: Address,
    pub images: Vec<String>,
    pub package: Option<PackageTier>,
    pub property_type: Option<PropertyType>,
    pub created_at: DateTime<Utc>,
    /// Derived locally from the saved set, never sent by the server
    #[serde(default)]
    pub is_saved: bool,
}

impl SearchResultItem {
    pub fn is_room(&self) -> bool {
        matches!(self.kind, ItemKind::Room)
    }
}

fn default_true() -> bool {
    true
}

/// Listing post as returned by `/api/posts*`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    pub area: f64,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub package_type: Option<PackageTier>,
    #[serde(default)]
    pub property_type: Option<PropertyType>,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PostRecord> for SearchResultItem {
    fn from(post: PostRecord) -> Self {
        Self {
            id: post.id,
            kind: ItemKind::Post {
                room_id: post.room_id.filter(|id| !id.is_empty()),
            },
            title: post.title,
            price: post.price,
            area: post.area,
            address: post.address,
            images: post.images,
            package: post.package_type,
            property_type: post.property_type,
            created_at: post.created_at,
            is_saved: false,
        }
    }
}

/// Bookable room as returned by `/rooms*`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub accommodation_id: Option<String>,
    pub name: String,
    pub price: i64,
    pub area: f64,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub package_type: Option<PackageTier>,
    #[serde(default)]
    pub property_type: Option<PropertyType>,
    pub created_at: DateTime<Utc>,
}

impl From<RoomRecord> for SearchResultItem {
    fn from(room: RoomRecord) -> Self {
        Self {
            id: room.id,
            kind: ItemKind::Room,
            title: room.name,
            price: room.price,
            area: room.area,
            address: room.address,
            images: room.images,
            package: room.package_type,
            property_type: room.property_type,
            created_at: room.created_at,
            is_saved: false,
        }
    }
}

/// Body of `GET /api/posts/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub posts: Vec<PostRecord>,
    pub total: u64,
}

impl SearchResponse {
    pub fn into_items(self) -> Vec<SearchResultItem> {
        self.posts.into_iter().map(SearchResultItem::from).collect()
    }
}

/// Accommodation owned by a landlord, as returned by `/api/accommodations*`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub property_type: PropertyType,
    pub address: Address,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub total_rooms: u32,
}

/// Signed-in user snapshot kept next to the token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_json() -> serde_json::Value {
        json!({
            "_id": "p1",
            "title": "Phòng trọ gần ĐH Bách Khoa",
            "price": 2_500_000,
            "area": 22.5,
            "address": { "street": "12 Tạ Quang Bửu", "district": "Hai Bà Trưng", "city": "Hà Nội" },
            "images": ["https://img/1.jpg"],
            "packageType": "VIP_2",
            "roomId": "r9",
            "createdAt": "2024-05-01T08:00:00Z"
        })
    }

    #[test]
    fn test_post_record_converts_to_post_item() {
        let post: PostRecord = serde_json::from_value(post_json()).unwrap();
        let item = SearchResultItem::from(post);

        assert_eq!(item.id, "p1");
        assert_eq!(
            item.kind,
            ItemKind::Post {
                room_id: Some("r9".to_string())
            }
        );
        assert_eq!(item.package, Some(PackageTier::Vip2));
        assert!(!item.is_saved);
    }

    #[test]
    fn test_empty_room_reference_is_dropped() {
        let mut value = post_json();
        value["roomId"] = json!("");
        let item = SearchResultItem::from(serde_json::from_value::<PostRecord>(value).unwrap());
        assert_eq!(item.kind, ItemKind::Post { room_id: None });
    }

    #[test]
    fn test_unknown_package_is_rejected() {
        let mut value = post_json();
        value["packageType"] = json!("PLATINUM");
        assert!(serde_json::from_value::<PostRecord>(value).is_err());
    }

    #[test]
    fn test_search_response_requires_posts_array() {
        let bad = json!({ "data": { "posts": [] }, "total": 0 });
        assert!(serde_json::from_value::<SearchResponse>(bad).is_err());

        let good = json!({ "posts": [post_json()], "total": 1 });
        let response: SearchResponse = serde_json::from_value(good).unwrap();
        assert_eq!(response.into_items().len(), 1);
    }

    #[test]
    fn test_address_display_skips_blank_parts() {
        let address = Address {
            street: "5 Lê Lợi".into(),
            ward: " ".into(),
            district: "Quận 1".into(),
            city: "TP. Hồ Chí Minh".into(),
        };
        assert_eq!(address.display_line(), "5 Lê Lợi, Quận 1, TP. Hồ Chí Minh");
    }
}
