use crate::models::Feature;
use crate::query::{QueryParams, PAGE_KEY};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Params the backend expects as integers
pub const NUMERIC_KEYS: [&str; 5] = ["minRent", "maxRent", "minSize", "maxSize", "capacity"];
/// Availability flag; feature flags are booleans too
pub const AVAILABILITY_KEY: &str = "isAvailable";

fn is_boolean_key(key: &str) -> bool {
    key == AVAILABILITY_KEY || Feature::from_code(key).is_some()
}

/// Typed parameter object sent to `GET /api/posts/search`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SearchRequest {
    params: BTreeMap<String, Value>,
}

impl SearchRequest {
    /// The request used when the URL carries no filters: everything currently available
    pub fn default_view() -> Self {
        let mut params = BTreeMap::new();
        params.insert(AVAILABILITY_KEY.to_string(), Value::Bool(true));
        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Flattened `key=value` pairs for the query string
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), value)
            })
            .collect()
    }
}

/// Build the backend request for the current URL params.
///
/// `page` is dropped (pagination is client-side), numeric and boolean keys
/// are coerced, and values that fail coercion are left out.
pub fn build_request(params: &QueryParams) -> SearchRequest {
    let mut request = SearchRequest::default();

    for (key, raw) in params.iter().filter(|(key, _)| *key != PAGE_KEY) {
        let value = if NUMERIC_KEYS.contains(&key) {
            match raw.trim().parse::<i64>() {
                Ok(n) => Value::from(n),
                Err(_) => {
                    warn!("Dropping non-numeric {}={}", key, raw);
                    continue;
                }
            }
        } else if is_boolean_key(key) {
            match raw.trim() {
                "true" | "1" => Value::Bool(true),
                "false" | "0" => Value::Bool(false),
                _ => {
                    warn!("Dropping non-boolean {}={}", key, raw);
                    continue;
                }
            }
        } else {
            Value::String(raw.to_string())
        };
        request.params.insert(key.to_string(), value);
    }

    if request.is_empty() {
        return SearchRequest::default_view();
    }
    request
}
