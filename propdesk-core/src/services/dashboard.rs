//! Dashboard service - overview statistics across every admin area
//!
//! All source lists are fetched concurrently. A sub-fetch that fails reads
//! as an empty response, so one broken endpoint zeroes its own counters
//! instead of blanking the dashboard. The stats are computed once every
//! fetch has settled and returned as one value.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::api::ApiClient;
use crate::domain::aggregate::{count_matching, count_where, sum_decimal};
use crate::domain::envelope::extract_default_list;
use crate::domain::fields::as_text;
use crate::domain::ListQuery;

use super::kyc::KYC_LIST_PATH;
use super::purchase::{PurchaseStats, PURCHASES_PATH};
use super::transactions::TRANSACTIONS_PATH;
use super::users::USERS_PATH;
use super::withdrawals::WITHDRAWALS_PATH;
use super::AGGREGATE_LIMIT;

const TICKETS_PATH: &str = "/support/admin/list";

/// Raw responses the dashboard is computed from
#[derive(Debug, Clone, Default)]
pub struct DashboardSources {
    pub users: JsonValue,
    pub kyc: JsonValue,
    pub purchases: JsonValue,
    pub withdrawals: JsonValue,
    pub transactions: JsonValue,
    pub tickets: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub active_users: usize,
    pub blocked_users: usize,

    pub kyc_total: usize,
    pub kyc_pending: usize,
    pub kyc_approved: usize,
    pub kyc_rejected: usize,

    pub total_purchases_count: usize,
    pub unique_user_ids: usize,
    pub avg_accounts_per_user: String,
    pub purchase_total_revenue: Decimal,

    pub withdrawals_total: usize,
    pub withdrawals_pending: usize,
    pub withdrawals_pending_amount: Decimal,

    pub transactions_total: usize,
    pub transactions_volume: Decimal,

    pub open_tickets: usize,
    pub total_tickets: usize,
}

fn status_is(item: &JsonValue, wanted: &[&str]) -> bool {
    as_text(item, "status")
        .map(|s| wanted.iter().any(|w| s.eq_ignore_ascii_case(w)))
        .unwrap_or(false)
}

/// Derive the dashboard from the raw responses.
///
/// Pure: any response shape, including `{}` from a failed fetch, is accepted.
pub fn compute_dashboard(sources: &DashboardSources) -> DashboardStats {
    let users = extract_default_list(&sources.users);
    let kyc = extract_default_list(&sources.kyc);
    let purchases = extract_default_list(&sources.purchases);
    let withdrawals = extract_default_list(&sources.withdrawals);
    let transactions = extract_default_list(&sources.transactions);
    let tickets = extract_default_list(&sources.tickets);

    let purchase_stats = PurchaseStats::from_purchases(&purchases);
    let pending_withdrawals: Vec<JsonValue> = withdrawals
        .iter()
        .filter(|w| status_is(w, &["pending"]))
        .cloned()
        .collect();

    DashboardStats {
        total_users: users.len(),
        active_users: count_where(&users, "status", "Active"),
        blocked_users: count_where(&users, "status", "Blocked"),

        kyc_total: kyc.len(),
        kyc_pending: count_where(&kyc, "status", "Pending"),
        kyc_approved: count_where(&kyc, "status", "Approved"),
        kyc_rejected: count_where(&kyc, "status", "Rejected"),

        total_purchases_count: purchase_stats.total_purchases_count,
        unique_user_ids: purchase_stats.unique_user_ids,
        avg_accounts_per_user: purchase_stats.avg_accounts_per_user,
        purchase_total_revenue: purchase_stats.purchase_total_revenue,

        withdrawals_total: withdrawals.len(),
        withdrawals_pending: pending_withdrawals.len(),
        withdrawals_pending_amount: sum_decimal(&pending_withdrawals, "amount"),

        transactions_total: transactions.len(),
        transactions_volume: sum_decimal(&transactions, "amount"),

        open_tickets: count_matching(&tickets, |t| status_is(t, &["open", "in-progress"])),
        total_tickets: tickets.len(),
    }
}

#[derive(Clone)]
pub struct DashboardService {
    client: ApiClient,
}

impl DashboardService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch every source concurrently; failures read as empty
    pub async fn sources(&self) -> DashboardSources {
        let query = ListQuery::new(AGGREGATE_LIMIT).to_pairs();
        let (users, kyc, purchases, withdrawals, transactions, tickets) = futures::join!(
            self.client.get_or_empty(USERS_PATH, query.clone()),
            self.client.get_or_empty(KYC_LIST_PATH, query.clone()),
            self.client.get_or_empty(PURCHASES_PATH, query.clone()),
            self.client.get_or_empty(WITHDRAWALS_PATH, query.clone()),
            self.client.get_or_empty(TRANSACTIONS_PATH, query.clone()),
            self.client.get_or_empty(TICKETS_PATH, query),
        );
        DashboardSources {
            users,
            kyc,
            purchases,
            withdrawals,
            transactions,
            tickets,
        }
    }

    pub async fn stats(&self) -> DashboardStats {
        compute_dashboard(&self.sources().await)
    }
}
