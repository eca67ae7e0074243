use crate::filters::format_millions;
use crate::models::{ItemKind, SearchResultItem};
use serde::Serialize;
use std::fmt;

/// Where clicking a result card goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    /// Booking page of a directly bookable room
    RoomBooking { room_id: String },
    /// Contact-only listing detail
    PostDetail { post_id: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::RoomBooking { room_id } => format!("/rooms/{room_id}"),
            Route::PostDetail { post_id } => format!("/posts/{post_id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Navigation target for an item. A post that embeds a room reference books that room.
pub fn route_for(item: &SearchResultItem) -> Route {
    match &item.kind {
        ItemKind::Room => Route::RoomBooking {
            room_id: item.id.clone(),
        },
        ItemKind::Post {
            room_id: Some(room_id),
        } => Route::RoomBooking {
            room_id: room_id.clone(),
        },
        ItemKind::Post { room_id: None } => Route::PostDetail {
            post_id: item.id.clone(),
        },
    }
}

/// The two mutually exclusive card layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardVariant {
    /// Shows a "book now" action
    Bookable,
    /// Shows landlord contact instead
    ContactOnly,
}

/// Card layout follows the item kind only; the embedded room of a post affects navigation, not layout
pub fn card_variant(item: &SearchResultItem) -> CardVariant {
    match item.kind {
        ItemKind::Room => CardVariant::Bookable,
        ItemKind::Post { .. } => CardVariant::ContactOnly,
    }
}

/// Everything a result card needs, already formatted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: String,
    pub variant: CardVariant,
    pub route: Route,
    pub title: String,
    pub price: String,
    pub area: String,
    pub address: String,
    pub thumbnail: Option<String>,
    pub badge: Option<&'static str>,
    pub is_saved: bool,
}

impl From<&SearchResultItem> for CardView {
    fn from(item: &SearchResultItem) -> Self {
        Self {
            id: item.id.clone(),
            variant: card_variant(item),
            route: route_for(item),
            title: item.title.clone(),
            price: format!("{}/tháng", format_millions(item.price.max(0) as u64)),
            area: format_area(item.area),
            address: item.address.display_line(),
            thumbnail: item.images.first().cloned(),
            badge: item.package.map(|p| p.label()),
            is_saved: item.is_saved,
        }
    }
}

fn format_area(area: f64) -> String {
    if area.fract() == 0.0 {
        format!("{area:.0} m²")
    } else {
        format!("{area:.1} m²")
    }
}
