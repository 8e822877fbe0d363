//! Referral commands

use anyhow::Result;
use clap::Subcommand;
use rust_decimal::Decimal;

use propdesk_core::ListQuery;

use super::{apply_mutation, get_context, print_json, with_spinner, ListArgs, MutationTarget};
use crate::output::{self, money, Column};

const COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("Referrer", "referrer.email"),
    ("Referred", "referred.email"),
    ("Reward", "rewardAmount"),
    ("Status", "status"),
    ("Date", "createdAt"),
];

#[derive(Subcommand)]
pub enum ReferralsCommands {
    /// List referrals
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        status: Option<String>,
    },
    /// Credit a referral reward
    Credit {
        id: String,
        amount: Decimal,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Cancel a referral
    Cancel {
        id: String,
        #[arg(long)]
        reason: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Referral statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(command: ReferralsCommands) -> Result<()> {
    let ctx = get_context()?;
    let svc = &ctx.referral_service;
    let query = ListQuery::new(ctx.config.page_size);

    match command {
        ReferralsCommands::List { list, status } => {
            let query = list.query(&ctx).filter_opt("status", status.as_deref());
            let page = with_spinner("Loading referrals...", svc.list(&query)).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("Referrals", &page, COLUMNS);
        }
        ReferralsCommands::Credit {
            id,
            amount,
            force,
            json,
        } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "referrals credit",
                    resource: "referral",
                    id: &id,
                    prompt: format!("Credit {} for referral {}?", money(amount), id),
                },
                force,
                json,
                || svc.credit(&id, amount),
                || svc.list(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("Referrals", &page, COLUMNS);
            }
        }
        ReferralsCommands::Cancel {
            id,
            reason,
            force,
            json,
        } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "referrals cancel",
                    resource: "referral",
                    id: &id,
                    prompt: format!("Cancel referral {}?", id),
                },
                force,
                json,
                || svc.cancel(&id, &reason),
                || svc.list(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("Referrals", &page, COLUMNS);
            }
        }
        ReferralsCommands::Stats { json } => {
            let stats = with_spinner("Loading referral stats...", svc.stats()).await?;
            if json {
                return print_json(&stats);
            }
            output::print_stats("Referrals", &stats);
        }
    }

    Ok(())
}
