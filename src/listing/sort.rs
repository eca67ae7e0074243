use crate::models::{package_priority, SearchResultItem};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Secondary ordering picked by the user; package priority always comes first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Default,
    /// Creation time, newest first
    Newest,
    /// Rent, cheapest first
    Price,
    /// Floor area, largest first
    Area,
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(SortMode::Default),
            "newest" => Ok(SortMode::Newest),
            "price" => Ok(SortMode::Price),
            "area" => Ok(SortMode::Area),
            other => Err(format!("unknown sort mode: {other}")),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortMode::Default => "default",
            SortMode::Newest => "newest",
            SortMode::Price => "price",
            SortMode::Area => "area",
        };
        f.write_str(name)
    }
}

fn compare(a: &SearchResultItem, b: &SearchResultItem, mode: SortMode) -> Ordering {
    let by_package = package_priority(a.package).cmp(&package_priority(b.package));
    by_package.then_with(|| match mode {
        SortMode::Default => Ordering::Equal,
        SortMode::Newest => b.created_at.cmp(&a.created_at),
        SortMode::Price => a.price.cmp(&b.price),
        SortMode::Area => b.area.total_cmp(&a.area),
    })
}

/// Stable sort: package priority, then `mode`, then original order
pub fn sort_items(items: &mut [SearchResultItem], mode: SortMode) {
    items.sort_by(|a, b| compare(a, b, mode));
}
