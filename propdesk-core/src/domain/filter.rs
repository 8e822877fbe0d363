//! Client-side filters applied on top of server results

use serde_json::Value as JsonValue;

use super::fields::as_text;

/// Keep records where any of `fields` contains `needle` (case-insensitive).
///
/// An empty or whitespace-only needle returns the input unchanged.
pub fn search_filter(items: &[JsonValue], fields: &[&str], needle: &str) -> Vec<JsonValue> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| {
            fields.iter().any(|field| {
                as_text(item, field)
                    .map(|v| v.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
        })
        .cloned()
        .collect()
}

/// Keep records where `field` equals `value` (case-insensitive).
///
/// `""` and `"all"` mean "no filter".
pub fn filter_eq(items: &[JsonValue], field: &str, value: &str) -> Vec<JsonValue> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| {
            as_text(item, field)
                .map(|v| v.eq_ignore_ascii_case(value))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Fields searched on user-like records
pub const USER_SEARCH_FIELDS: &[&str] = &[
    "name",
    "firstName",
    "lastName",
    "email",
    "phone",
    "username",
    "user.name",
    "user.email",
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users() -> Vec<JsonValue> {
        vec![
            json!({"name": "Alice Smith", "email": "alice@example.com"}),
            json!({"name": "Bob", "email": "bob@example.com", "phone": "555-0101"}),
            json!({"user": {"name": "Carol", "email": "carol@desk.io"}}),
        ]
    }

    #[test]
    fn test_empty_search_is_identity() {
        assert_eq!(search_filter(&users(), USER_SEARCH_FIELDS, ""), users());
        assert_eq!(search_filter(&users(), USER_SEARCH_FIELDS, "   "), users());
    }

    #[test]
    fn test_search_no_match_is_empty() {
        assert!(search_filter(&users(), USER_SEARCH_FIELDS, "zzz-nobody").is_empty());
    }

    #[test]
    fn test_search_case_insensitive_and_nested() {
        let found = search_filter(&users(), USER_SEARCH_FIELDS, "ALICE");
        assert_eq!(found.len(), 1);
        let found = search_filter(&users(), USER_SEARCH_FIELDS, "desk.io");
        assert_eq!(found.len(), 1);
        let found = search_filter(&users(), USER_SEARCH_FIELDS, "0101");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_kyc_status_filter() {
        let kyc = vec![
            json!({"_id": "1", "status": "Approved"}),
            json!({"_id": "2", "status": "Pending"}),
            json!({"_id": "3", "status": "Approved"}),
            json!({"_id": "4", "status": "Rejected"}),
            json!({"_id": "5", "status": "Pending"}),
        ];
        assert_eq!(filter_eq(&kyc, "status", "Approved").len(), 2);
        assert_eq!(filter_eq(&kyc, "status", "all").len(), 5);
        assert_eq!(filter_eq(&kyc, "status", "").len(), 5);
    }
}
