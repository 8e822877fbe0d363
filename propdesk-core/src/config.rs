//! Configuration management
//!
//! Settings live in `settings.json` inside the PropDesk directory:
//! ```json
//! {
//!   "api": { "baseUrl": "https://api.example.com/api", "timeoutSecs": 30 },
//!   "ui": { "pageSize": 10, "searchDebounceMs": 400 },
//!   "notFoundAsEmpty": ["/news/admin", "/content/admin/faqs"]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::query::DEFAULT_PAGE_SIZE;

/// Default API base URL when nothing is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Environment variable overriding the configured base URL
pub const API_URL_ENV: &str = "PROPDESK_API_URL";

/// Search debounce bounds in milliseconds
pub const MIN_DEBOUNCE_MS: u64 = 300;
pub const MAX_DEBOUNCE_MS: u64 = 500;
const DEFAULT_DEBOUNCE_MS: u64 = 400;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Endpoints whose 404 means "no records yet" rather than an error
pub const DEFAULT_NOT_FOUND_AS_EMPTY: &[&str] = &[
    "/news/admin",
    "/news/admin/categories",
    "/content/admin/faqs",
    "/content/admin/faq",
];

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    api: ApiSettings,
    #[serde(default)]
    ui: UiSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    not_found_as_empty: Option<Vec<String>>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    search_debounce_ms: Option<u64>,
}

/// PropDesk configuration (resolved view of settings plus env overrides)
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
    pub page_size: u32,
    pub search_debounce_ms: u64,
    pub not_found_as_empty: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: DEFAULT_DEBOUNCE_MS,
            not_found_as_empty: DEFAULT_NOT_FOUND_AS_EMPTY
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Load config from the PropDesk directory
    ///
    /// The base URL can be overridden with `PROPDESK_API_URL` (for CI and
    /// staging backends). A malformed settings file falls back to defaults.
    pub fn load(propdesk_dir: &Path) -> Result<Self> {
        let settings_path = propdesk_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let defaults = Config::default();
        let base_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or(raw.api.base_url)
            .unwrap_or(defaults.base_url);

        Ok(Self {
            base_url: normalize_base_url(&base_url),
            timeout: raw
                .api
                .timeout_secs
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            page_size: raw.ui.page_size.filter(|p| *p > 0).unwrap_or(defaults.page_size),
            search_debounce_ms: raw
                .ui
                .search_debounce_ms
                .map(|ms| ms.clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS))
                .unwrap_or(defaults.search_debounce_ms),
            not_found_as_empty: raw
                .not_found_as_empty
                .unwrap_or(defaults.not_found_as_empty),
        })
    }

    /// Save config to the PropDesk directory
    /// Preserves other settings that the CLI doesn't manage
    pub fn save(&self, propdesk_dir: &Path) -> Result<()> {
        let settings_path = propdesk_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.api.base_url = Some(self.base_url.clone());
        settings.api.timeout_secs = Some(self.timeout.as_secs());
        settings.ui.page_size = Some(self.page_size);
        settings.ui.search_debounce_ms = Some(self.search_debounce_ms);
        settings.not_found_as_empty = Some(self.not_found_as_empty.clone());

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Debounce applied to free-text search
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Whether a 404 from `path` should read as an empty collection
    pub fn treats_not_found_as_empty(&self, path: &str) -> bool {
        let path = path.split('?').next().unwrap_or(path).trim_end_matches('/');
        self.not_found_as_empty
            .iter()
            .any(|p| p.trim_end_matches('/') == path)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        std::env::remove_var(API_URL_ENV);
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.search_debounce_ms, 400);
        assert!(config.treats_not_found_as_empty("/news/admin"));
        assert!(config.treats_not_found_as_empty("/content/admin/faqs/"));
        assert!(!config.treats_not_found_as_empty("/users"));
    }

    #[test]
    fn test_load_clamps_and_preserves_unknown_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"api":{"baseUrl":"https://admin.example.com/api/","timeoutSecs":5},
                "ui":{"pageSize":25,"searchDebounceMs":50},
                "notFoundAsEmpty":["/blogs/admin"],
                "theme":"dark"}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        if std::env::var(API_URL_ENV).is_err() {
            assert_eq!(config.base_url, "https://admin.example.com/api");
        }
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.search_debounce_ms, MIN_DEBOUNCE_MS);
        assert!(config.treats_not_found_as_empty("/blogs/admin"));
        assert!(!config.treats_not_found_as_empty("/news/admin"));

        config.page_size = 50;
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        let saved: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(saved["theme"], "dark");
        assert_eq!(saved["ui"]["pageSize"], 50);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{not json").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }
}
