use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PER_PAGE: usize = 10;
pub const DEFAULT_STORAGE_PATH: &str = "viestay-storage.json";
pub const DEFAULT_UPLOAD_URL: &str = "https://api.cloudinary.com/v1_1/viestay/image/upload";
pub const DEFAULT_UPLOAD_PRESET: &str = "viestay_unsigned";

/// Runtime configuration for the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL, without trailing slash
    pub api_base_url: String,
    /// Per-request timeout; a timeout is treated as a retryable failure
    pub request_timeout: Duration,
    /// Results shown per page in the search view
    pub results_per_page: usize,
    /// JSON file standing in for the browser's local storage
    pub storage_path: PathBuf,
    /// Unsigned upload endpoint of the image CDN
    pub upload_url: String,
    pub upload_preset: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            results_per_page: DEFAULT_PER_PAGE,
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            upload_preset: DEFAULT_UPLOAD_PRESET.to_string(),
        }
    }
}

impl Config {
    /// Build a config from `VIESTAY_*` environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("VIESTAY_API_BASE_URL") {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = lookup("VIESTAY_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("Invalid VIESTAY_TIMEOUT_SECS: {secs}"))?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(per_page) = lookup("VIESTAY_PER_PAGE") {
            let per_page: usize = per_page
                .parse()
                .with_context(|| format!("Invalid VIESTAY_PER_PAGE: {per_page}"))?;
            anyhow::ensure!(per_page > 0, "VIESTAY_PER_PAGE must be positive");
            config.results_per_page = per_page;
        }
        if let Some(path) = lookup("VIESTAY_STORAGE") {
            config.storage_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("VIESTAY_UPLOAD_URL") {
            config.upload_url = url;
        }
        if let Some(preset) = lookup("VIESTAY_UPLOAD_PRESET") {
            config.upload_preset = preset;
        }

        Ok(config)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.request_timeout.as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.results_per_page, 10);
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = Config::from_lookup(lookup_from(&[
            ("VIESTAY_API_BASE_URL", "https://api.viestay.vn/"),
            ("VIESTAY_TIMEOUT_SECS", "3"),
            ("VIESTAY_PER_PAGE", "20"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.viestay.vn");
        assert_eq!(config.timeout_secs(), 3);
        assert_eq!(config.results_per_page, 20);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("VIESTAY_TIMEOUT_SECS", "ten")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("VIESTAY_PER_PAGE", "0")])).is_err());
    }
}
