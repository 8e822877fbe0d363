//! Withdrawal commands - review payout requests

use anyhow::Result;
use clap::Subcommand;

use propdesk_core::services::{WithdrawalPage, WithdrawalStats};
use propdesk_core::ListQuery;

use super::{apply_mutation, get_context, print_json, with_spinner, ListArgs, MutationTarget};
use crate::output::{self, money, Column};

const COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("User", "user.email"),
    ("Amount", "amount"),
    ("Method", "paymentMethod"),
    ("Status", "status"),
    ("Requested", "createdAt"),
];

#[derive(Subcommand)]
pub enum WithdrawalsCommands {
    /// List payout requests with counters
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by status (pending, approved, rejected)
        #[arg(long)]
        status: Option<String>,
    },
    /// Approve a payout request
    Approve {
        id: String,
        /// Payment reference to store with the payout
        #[arg(long)]
        transaction_id: Option<String>,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Reject a payout request
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
}

fn print_stats(stats: &WithdrawalStats) {
    output::info(&format!(
        "{} requests ({} pending, {} approved, {} rejected)  total {}  pending {}",
        stats.total,
        stats.pending,
        stats.approved,
        stats.rejected,
        money(stats.total_amount),
        money(stats.pending_amount)
    ));
}

fn print_withdrawals(withdrawals: &WithdrawalPage) {
    output::print_page("Withdrawals", &withdrawals.page, COLUMNS);
    print_stats(&withdrawals.stats);
}

pub async fn run(command: WithdrawalsCommands) -> Result<()> {
    let ctx = get_context()?;
    let svc = &ctx.withdrawal_service;
    let pending = ListQuery::new(ctx.config.page_size).filter("status", "pending");

    match command {
        WithdrawalsCommands::List { list, status } => {
            let query = list.query(&ctx).filter_opt("status", status.as_deref());
            let withdrawals = with_spinner("Loading withdrawals...", svc.list(&query)).await?;
            if list.json {
                return print_json(&withdrawals);
            }
            print_withdrawals(&withdrawals);
        }
        WithdrawalsCommands::Approve {
            id,
            transaction_id,
            force,
            json,
        } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "withdrawals approve",
                    resource: "withdrawal",
                    id: &id,
                    prompt: format!("Approve withdrawal {}?", id),
                },
                force,
                json,
                || svc.approve(&id, transaction_id.as_deref()),
                || svc.list(&pending),
            )
            .await?;
            if let (Some(withdrawals), false) = (refreshed, json) {
                print_withdrawals(&withdrawals);
            }
        }
        WithdrawalsCommands::Reject {
            id,
            reason,
            force,
            json,
        } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "withdrawals reject",
                    resource: "withdrawal",
                    id: &id,
                    prompt: format!("Reject withdrawal {} ({})?", id, reason.trim()),
                },
                force,
                json,
                || svc.reject(&id, &reason),
                || svc.list(&pending),
            )
            .await?;
            if let (Some(withdrawals), false) = (refreshed, json) {
                print_withdrawals(&withdrawals);
            }
        }
    }

    Ok(())
}
