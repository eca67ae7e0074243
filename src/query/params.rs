use std::collections::BTreeMap;
use url::form_urlencoded;

/// Pagination key, dropped whenever a filter changes
pub const PAGE_KEY: &str = "page";
/// Canonical property-type key
pub const PROPERTY_TYPE_KEY: &str = "propertyType";
/// Legacy alias still found in old links; folded into `propertyType`
pub const LEGACY_TYPE_KEY: &str = "type";

/// Changes to apply to a parameter set. `None` removes the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamDelta {
    changes: Vec<(String, Option<String>)>,
}

impl ParamDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl ToString) -> Self {
        self.changes.push((key.to_string(), Some(value.to_string())));
        self
    }

    pub fn remove(mut self, key: &str) -> Self {
        self.changes.push((key.to_string(), None));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.changes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn touches(&self, key: &str) -> bool {
        self.changes.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Canonical filter state, as it appears in the search URL's query string.
/// Empty values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without the leading `?`
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            params.set(&key, &value);
        }
        params.canonicalize();
        params
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.entries.iter())
            .finish()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set a key; an empty or whitespace-only value removes it instead
    pub fn set(&mut self, key: &str, value: &str) {
        if value.trim().is_empty() {
            self.entries.remove(key);
        } else {
            self.entries.insert(key.to_string(), value.to_string());
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy of this set with `delta` applied on top
    pub fn merged(&self, delta: &ParamDelta) -> Self {
        let mut next = self.clone();
        for (key, value) in delta.iter() {
            match value {
                Some(value) => next.set(key, value),
                None => {
                    next.remove(key);
                }
            }
        }
        next.canonicalize();
        next
    }

    /// Requested page, 1 when absent or unparsable
    pub fn page(&self) -> u32 {
        self.get(PAGE_KEY)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    /// Fold the legacy `type` key into `propertyType`. The canonical key wins on conflict.
    fn canonicalize(&mut self) {
        if let Some(legacy) = self.entries.remove(LEGACY_TYPE_KEY) {
            self.entries
                .entry(PROPERTY_TYPE_KEY.to_string())
                .or_insert(legacy);
        }
    }
}
