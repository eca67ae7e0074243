pub mod pagination;
pub mod sort;

pub use pagination::Pagination;
pub use sort::{sort_items, SortMode};
