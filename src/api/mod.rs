pub mod accommodations;
pub mod client;
pub mod posts;
pub mod upload;


pub use accommodations::AccommodationDraft;
pub use client::ApiClient;
pub use upload::image_mime;
