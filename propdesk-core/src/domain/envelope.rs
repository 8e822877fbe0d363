//! Response envelope handling
//!
//! The admin API normally answers list endpoints with
//! `{ success, result: { data, pagination } }`, but several endpoints drift:
//! some return `{ result: [...] }`, some `{ data: [...] }`, some a bare array.
//! Everything here is pure so it can be tested without a network.

use serde::Serialize;
use serde_json::Value as JsonValue;

use super::fields::get_path;

/// Where a list may live inside a response, tried in order.
///
/// The empty path means "the response itself".
pub const DEFAULT_LIST_PATHS: &[&str] = &["result.data", "result", "data", ""];

/// Pick the first candidate path that resolves to a present, non-null value
/// and return it as a list. A non-array pick yields an empty list.
///
/// Candidates that resolve to `null` or are missing are skipped, so
/// `{ result: null, data: [...] }` still finds `data`.
pub fn extract_list(response: &JsonValue, paths: &[&str]) -> Vec<JsonValue> {
    let picked = paths.iter().find_map(|path| {
        let value = get_path(response, path)?;
        if value.is_null() {
            return None;
        }
        // `result` holding `{ data, pagination }` is an envelope, not the list;
        // `result.data` earlier in the chain already had its chance.
        if value.is_object() && !path.is_empty() {
            return None;
        }
        Some(value)
    });

    match picked {
        Some(JsonValue::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// Extract a list with the default candidate chain
pub fn extract_default_list(response: &JsonValue) -> Vec<JsonValue> {
    extract_list(response, DEFAULT_LIST_PATHS)
}

/// Extract a single record: `result` → `data` → the response itself
pub fn extract_object(response: &JsonValue) -> JsonValue {
    for path in ["result", "data"] {
        if let Some(value) = get_path(response, path) {
            if value.is_object() {
                return value.clone();
            }
        }
    }
    response.clone()
}

/// Pagination block attached to a list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Pagination for a response that carried no pagination block
    pub fn single_page(item_count: usize, page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            total: item_count as u64,
            total_pages: if item_count == 0 { 0 } else { 1 },
        }
    }
}

fn read_u64(block: &JsonValue, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| match block.get(*key)? {
        JsonValue::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Read the pagination block with fallbacks.
///
/// Looks in `result.pagination` then `pagination`. Missing page counts are
/// computed from `total` and `limit`; a response with no block at all is a
/// single page holding `item_count` items.
pub fn extract_pagination(
    response: &JsonValue,
    item_count: usize,
    requested_page: u32,
    requested_limit: u32,
) -> Pagination {
    let block = ["result.pagination", "pagination"]
        .iter()
        .find_map(|path| get_path(response, path).filter(|v| v.is_object()));

    let Some(block) = block else {
        return Pagination::single_page(item_count, requested_page, requested_limit);
    };

    let page = read_u64(block, &["page", "currentPage"]).unwrap_or(requested_page as u64) as u32;
    let limit = read_u64(block, &["limit", "pageSize", "perPage"])
        .unwrap_or(requested_limit as u64)
        .max(1) as u32;
    let total = read_u64(block, &["total", "totalItems", "totalCount", "count"])
        .unwrap_or(item_count as u64);
    let total_pages = read_u64(block, &["totalPages", "pages"])
        .map(|p| p as u32)
        .unwrap_or_else(|| total.div_ceil(limit as u64) as u32);

    Pagination {
        page,
        limit,
        total,
        total_pages,
    }
}

/// One page of records with its pagination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// An empty first page
    pub fn empty(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::single_page(0, 1, limit),
        }
    }
}

impl Page<JsonValue> {
    /// Build a page from a raw list response
    pub fn from_response(response: &JsonValue, page: u32, limit: u32) -> Self {
        let items = extract_default_list(response);
        let pagination = extract_pagination(response, items.len(), page, limit);
        Self { items, pagination }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(items: &[JsonValue]) -> Vec<String> {
        items
            .iter()
            .map(|v| v["_id"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_all_envelope_shapes_yield_same_items() {
        let list = json!([{"_id": "a"}, {"_id": "b"}, {"_id": "c"}]);
        let shapes = [
            json!({"success": true, "result": {"data": list.clone(), "pagination": {"page": 1}}}),
            json!({"result": list.clone()}),
            json!({"data": list.clone()}),
            list.clone(),
        ];

        for shape in &shapes {
            assert_eq!(ids(&extract_default_list(shape)), vec!["a", "b", "c"], "shape: {}", shape);
        }
    }

    #[test]
    fn test_non_array_values_coerce_to_empty() {
        for shape in [
            json!(null),
            json!({}),
            json!({"result": {"data": null}}),
            json!({"result": {"data": {"not": "a list"}}}),
            json!({"data": "oops"}),
            json!("text"),
            json!(42),
        ] {
            assert!(extract_default_list(&shape).is_empty(), "shape: {}", shape);
        }
    }

    #[test]
    fn test_null_candidate_falls_through() {
        let v = json!({"result": null, "data": [{"_id": "x"}]});
        assert_eq!(ids(&extract_default_list(&v)), vec!["x"]);
    }

    #[test]
    fn test_custom_paths() {
        let v = json!({"result": {"withdrawals": [{"_id": "w1"}], "stats": {}}});
        assert_eq!(ids(&extract_list(&v, &["result.withdrawals", "result.data"])), vec!["w1"]);
    }

    #[test]
    fn test_extract_object() {
        assert_eq!(extract_object(&json!({"result": {"name": "a"}})), json!({"name": "a"}));
        assert_eq!(extract_object(&json!({"data": {"name": "b"}})), json!({"name": "b"}));
        assert_eq!(extract_object(&json!({"name": "c"})), json!({"name": "c"}));
    }

    #[test]
    fn test_pagination_from_block() {
        let v = json!({"result": {"data": [], "pagination": {"page": 2, "limit": 10, "total": 45}}});
        let p = extract_pagination(&v, 0, 1, 20);
        assert_eq!(p, Pagination { page: 2, limit: 10, total: 45, total_pages: 5 });
    }

    #[test]
    fn test_pagination_explicit_total_pages_and_strings() {
        let v = json!({"pagination": {"currentPage": "3", "limit": "5", "total": 11, "totalPages": 3}});
        let p = extract_pagination(&v, 1, 1, 20);
        assert_eq!(p.page, 3);
        assert_eq!(p.limit, 5);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn test_pagination_missing_block() {
        let v = json!([1, 2, 3]);
        let p = extract_pagination(&v, 3, 1, 20);
        assert_eq!(p, Pagination { page: 1, limit: 20, total: 3, total_pages: 1 });

        let p = extract_pagination(&json!([]), 0, 1, 20);
        assert_eq!(p.total_pages, 0);
    }
}
