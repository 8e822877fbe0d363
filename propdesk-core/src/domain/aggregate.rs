//! Derived statistics over extracted lists
//!
//! All functions accept plain slices produced by
//! [`extract_list`](super::envelope::extract_list), which are already
//! coerced to "array or empty", so none of them can fail.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value as JsonValue;

use super::fields::{as_decimal, as_text, id_of};

/// Number of records whose `field` equals `expected` (case-insensitive)
pub fn count_where(items: &[JsonValue], field: &str, expected: &str) -> usize {
    items
        .iter()
        .filter(|item| {
            as_text(item, field)
                .map(|v| v.eq_ignore_ascii_case(expected))
                .unwrap_or(false)
        })
        .count()
}

/// Number of records matching an arbitrary predicate
pub fn count_matching<F>(items: &[JsonValue], predicate: F) -> usize
where
    F: Fn(&JsonValue) -> bool,
{
    items.iter().filter(|item| predicate(item)).count()
}

/// Number of distinct non-empty ids found at `id_path`
pub fn unique_count(items: &[JsonValue], id_path: &str) -> usize {
    items
        .iter()
        .filter_map(|item| id_of(item, id_path))
        .collect::<HashSet<_>>()
        .len()
}

/// Sum of `field` across records with numeric-or-zero coercion
pub fn sum_decimal(items: &[JsonValue], field: &str) -> Decimal {
    items.iter().map(|item| as_decimal(item, field)).sum()
}

/// Sum of the first present field among `fields` for each record.
///
/// Purchases carry `totalAmount` on newer records and `amount` on older ones.
pub fn sum_first_of(items: &[JsonValue], fields: &[&str]) -> Decimal {
    items
        .iter()
        .map(|item| {
            fields
                .iter()
                .find(|f| super::fields::get_path(item, f).is_some_and(|v| !v.is_null()))
                .map(|f| as_decimal(item, f))
                .unwrap_or(Decimal::ZERO)
        })
        .sum()
}

/// `numerator / denominator` rendered with two decimals, `"0.00"` on zero
pub fn ratio(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        return "0.00".to_string();
    }
    let value = Decimal::from(numerator as u64) / Decimal::from(denominator as u64);
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Counts per distinct value of `field`. Missing values group under `"unknown"`.
pub fn group_counts(items: &[JsonValue], field: &str) -> BTreeMap<String, usize> {
    let mut groups = BTreeMap::new();
    for item in items {
        let key = as_text(item, field).unwrap_or_else(|| "unknown".to_string());
        *groups.entry(key).or_insert(0) += 1;
    }
    groups
}
