//! Withdrawal service - payout requests and their approval

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use crate::api::ApiClient;
use crate::domain::aggregate::{count_where, sum_decimal};
use crate::domain::envelope::extract_default_list;
use crate::domain::fields::{as_decimal, get_path};
use crate::domain::filter::filter_eq;
use crate::domain::result::Result;
use crate::domain::validation::require;
use crate::domain::{ListQuery, Page};

pub const WITHDRAWALS_PATH: &str = "/withdrawals/admin";

/// Counters shown above the withdrawal table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub total_amount: Decimal,
    pub pending_amount: Decimal,
}

impl WithdrawalStats {
    /// Read the stats block the backend embeds in the list response
    /// (`result.stats` or `stats`)
    pub fn from_embedded(response: &JsonValue) -> Option<Self> {
        let stats = get_path(response, "result.stats")
            .or_else(|| get_path(response, "stats"))
            .filter(|s| s.is_object())?;
        let count = |key: &str| as_decimal(stats, key).to_usize().unwrap_or(0);
        Some(Self {
            total: count("total"),
            pending: count("pending"),
            approved: count("approved"),
            rejected: count("rejected"),
            total_amount: as_decimal(stats, "totalAmount"),
            pending_amount: as_decimal(stats, "pendingAmount"),
        })
    }

    /// Derive the counters from the listed requests
    pub fn from_items(items: &[JsonValue]) -> Self {
        let pending = filter_eq(items, "status", "pending");
        Self {
            total: items.len(),
            pending: pending.len(),
            approved: count_where(items, "status", "approved"),
            rejected: count_where(items, "status", "rejected"),
            total_amount: sum_decimal(items, "amount"),
            pending_amount: sum_decimal(&pending, "amount"),
        }
    }
}

/// One page of withdrawals plus the counters
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalPage {
    pub page: Page<JsonValue>,
    pub stats: WithdrawalStats,
}

/// Withdrawal approval
#[derive(Clone)]
pub struct WithdrawalService {
    client: ApiClient,
}

impl WithdrawalService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Withdrawals (`status`, `search`) with stats; backend stats win,
    /// otherwise they are derived from the page
    pub async fn list(&self, query: &ListQuery) -> Result<WithdrawalPage> {
        let body = self.client.get(WITHDRAWALS_PATH, query.to_pairs()).await?;
        let page = Page::from_response(&body, query.page, query.limit);
        let stats = WithdrawalStats::from_embedded(&body)
            .unwrap_or_else(|| WithdrawalStats::from_items(&extract_default_list(&body)));
        Ok(WithdrawalPage { page, stats })
    }

    pub async fn approve(&self, id: &str, transaction_ref: Option<&str>) -> Result<JsonValue> {
        let mut body = json!({});
        if let Some(reference) = transaction_ref.map(str::trim).filter(|r| !r.is_empty()) {
            body["transactionId"] = json!(reference);
        }
        self.client
            .post(&format!("{}/{}/approve", WITHDRAWALS_PATH, id), body)
            .await
    }

    /// Reject a request; a reason is mandatory
    pub async fn reject(&self, id: &str, reason: &str) -> Result<JsonValue> {
        let reason = require("Rejection reason", reason)?;
        self.client
            .post(
                &format!("{}/{}/reject", WITHDRAWALS_PATH, id),
                json!({ "reason": reason }),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_stats_win() {
        let body = json!({"result": {"data": [], "stats": {"total": 7, "pending": 2, "totalAmount": "1500.5"}}});
        let stats = WithdrawalStats::from_embedded(&body).unwrap();
        assert_eq!(stats.total, 7);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.approved, 0);
        assert_eq!(stats.total_amount, Decimal::new(15005, 1));
    }

    #[test]
    fn test_derived_stats() {
        let items = vec![
            json!({"status": "pending", "amount": 100}),
            json!({"status": "pending", "amount": 50}),
            json!({"status": "approved", "amount": 200}),
        ];
        assert!(WithdrawalStats::from_embedded(&json!({"data": items})).is_none());
        let stats = WithdrawalStats::from_items(&items);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.pending_amount, Decimal::new(150, 0));
        assert_eq!(stats.total_amount, Decimal::new(350, 0));
    }

    #[test]
    fn test_derived_stats_ignore_status_case() {
        use crate::services::dashboard::{compute_dashboard, DashboardSources};

        let items = vec![
            json!({"status": "Pending", "amount": 80}),
            json!({"status": "PENDING", "amount": 20}),
            json!({"status": "Approved", "amount": 200}),
        ];
        let stats = WithdrawalStats::from_items(&items);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.pending_amount, Decimal::new(100, 0));

        let dashboard = compute_dashboard(&DashboardSources {
            withdrawals: json!({"result": {"data": items}}),
            ..Default::default()
        });
        assert_eq!(dashboard.withdrawals_pending, stats.pending);
        assert_eq!(dashboard.withdrawals_pending_amount, stats.pending_amount);
    }
}
