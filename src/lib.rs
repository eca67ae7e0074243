//! VieStay listing search client.
//!
//! Filter widgets produce query-parameter deltas ([`filters`]), the URL query
//! string is the single source of filter state ([`query`]), every change
//! triggers a last-request-wins search ([`search`]), and results are sorted
//! and paged in memory ([`listing`]) before being turned into cards
//! ([`render`]).

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod filters;
pub mod listing;
pub mod models;
pub mod query;
pub mod render;
pub mod saved;
pub mod search;
pub mod storage;

pub use config::Config;
pub use error::{ApiError, FieldError, StorageError};
