//! Dashboard command - platform overview

use anyhow::Result;
use colored::Colorize;

use super::{get_context, print_json, with_spinner};
use crate::output::{self, money};

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let stats = with_spinner("Loading dashboard...", ctx.dashboard_service.stats()).await;

    if json {
        return print_json(&stats);
    }

    println!("{}", "PropDesk Dashboard".bold());
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Area", "Metric", "Value"]);
    let rows = [
        ("Users", "Total", stats.total_users.to_string()),
        ("Users", "Active", stats.active_users.to_string()),
        ("Users", "Blocked", stats.blocked_users.to_string()),
        ("KYC", "Submissions", stats.kyc_total.to_string()),
        ("KYC", "Pending review", stats.kyc_pending.to_string()),
        ("KYC", "Approved", stats.kyc_approved.to_string()),
        ("KYC", "Rejected", stats.kyc_rejected.to_string()),
        ("Purchases", "Total", stats.total_purchases_count.to_string()),
        ("Purchases", "Unique buyers", stats.unique_user_ids.to_string()),
        ("Purchases", "Accounts per buyer", stats.avg_accounts_per_user.clone()),
        ("Purchases", "Revenue", money(stats.purchase_total_revenue)),
        ("Withdrawals", "Total", stats.withdrawals_total.to_string()),
        ("Withdrawals", "Pending", stats.withdrawals_pending.to_string()),
        ("Withdrawals", "Pending amount", money(stats.withdrawals_pending_amount)),
        ("Transactions", "Total", stats.transactions_total.to_string()),
        ("Transactions", "Volume", money(stats.transactions_volume)),
        ("Support", "Open tickets", stats.open_tickets.to_string()),
        ("Support", "All tickets", stats.total_tickets.to_string()),
    ];
    for (area, metric, value) in rows {
        table.add_row(vec![area.to_string(), metric.to_string(), value]);
    }
    println!("{}", table);

    if stats.kyc_pending > 0 || stats.withdrawals_pending > 0 {
        println!();
        output::warning(&format!(
            "{} KYC submission(s) and {} withdrawal(s) awaiting review",
            stats.kyc_pending, stats.withdrawals_pending
        ));
    }

    Ok(())
}
