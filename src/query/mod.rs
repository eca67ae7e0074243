pub mod params;
pub mod state;

pub use params::{ParamDelta, QueryParams, PAGE_KEY, PROPERTY_TYPE_KEY};
pub use state::{search_location, History, Navigator, QueryState, SEARCH_ROUTE};
