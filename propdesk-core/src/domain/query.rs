//! List query parameters shared by every paginated endpoint

use std::collections::BTreeMap;

use serde::Serialize;

/// Default page size when none is configured
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page, size, free-text search and categorical filters for a list call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            search: String::new(),
            filters: BTreeMap::new(),
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Add a filter; empty values and `"all"` are dropped
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_filter(key, value);
        self
    }

    /// Add a filter only when a value is present
    pub fn filter_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.filter(key, v),
            None => self,
        }
    }

    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            self.filters.remove(&key);
        } else {
            self.filters.insert(key, trimmed.to_string());
        }
    }

    /// Query pairs in a stable order: page, limit, search, then filters by key
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.max(1).to_string()),
            ("limit".to_string(), self.limit.max(1).to_string()),
        ];
        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("search".to_string(), search.to_string()));
        }
        pairs.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let q = ListQuery::default();
        assert_eq!(
            q.to_pairs(),
            vec![("page".into(), "1".into()), ("limit".into(), "10".into())]
        );
    }

    #[test]
    fn test_filters_skip_empty_and_all() {
        let q = ListQuery::new(20)
            .page(3)
            .search("  bob ")
            .filter("status", "Pending")
            .filter("type", "all")
            .filter("plan", "")
            .filter_opt("stage", None);
        assert_eq!(
            q.to_pairs(),
            vec![
                ("page".into(), "3".into()),
                ("limit".into(), "20".into()),
                ("search".into(), "bob".into()),
                ("status".into(), "Pending".into()),
            ]
        );
    }

    #[test]
    fn test_set_filter_all_removes() {
        let mut q = ListQuery::default().filter("status", "Approved");
        q.set_filter("status", "All");
        assert!(q.filters.is_empty());
    }

    #[test]
    fn test_page_zero_clamped() {
        let q = ListQuery::new(0).page(0);
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 1);
    }
}
