//! KYC commands - review identity and bank submissions

use anyhow::{bail, Result};
use clap::Subcommand;

use propdesk_core::domain::KycDecision;
use propdesk_core::ListQuery;

use super::{apply_mutation, get_context, print_json, with_spinner, ListArgs, MutationTarget};
use crate::output::{self, Column};

const COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("User", "user.email"),
    ("Name", "fullName"),
    ("Document", "documentType"),
    ("Status", "status"),
    ("Submitted", "createdAt"),
];

#[derive(Subcommand)]
pub enum KycCommands {
    /// List submissions
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by status (Pending, Approved, Rejected)
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one submission
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Approve a submission
    Approve {
        id: String,
        /// Optional reviewer note
        #[arg(long)]
        notes: Option<String>,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Reject a submission
    Reject {
        id: String,
        /// Reason shown to the user
        #[arg(long)]
        reason: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Accept or reject the bank details of a submission
    VerifyBank {
        id: String,
        /// Reject the bank details instead of accepting them
        #[arg(long)]
        reject: bool,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(command: KycCommands) -> Result<()> {
    let ctx = get_context()?;
    let svc = &ctx.kyc_service;
    let pending = ListQuery::new(ctx.config.page_size).filter("status", "Pending");

    match command {
        KycCommands::List { list, status } => {
            let query = list.query(&ctx).filter_opt("status", status.as_deref());
            let page = with_spinner("Loading KYC submissions...", svc.list(&query)).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("KYC submissions", &page, COLUMNS);
        }
        KycCommands::Show { id, json } => {
            let submission = svc.get(&id).await?;
            if json {
                return print_json(&submission);
            }
            output::print_record(&submission);
        }
        KycCommands::Approve {
            id,
            notes,
            force,
            json,
        } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "kyc approve",
                    resource: "kyc",
                    id: &id,
                    prompt: format!("Approve KYC submission {}?", id),
                },
                force,
                json,
                || svc.verify(&id, KycDecision::Approved, notes.as_deref()),
                || svc.list(&pending),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("Pending KYC", &page, COLUMNS);
            }
        }
        KycCommands::Reject {
            id,
            reason,
            force,
            json,
        } => {
            if reason.trim().is_empty() {
                bail!("A rejection reason is required");
            }
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "kyc reject",
                    resource: "kyc",
                    id: &id,
                    prompt: format!("Reject KYC submission {} ({})?", id, reason.trim()),
                },
                force,
                json,
                || svc.verify(&id, KycDecision::Rejected, Some(&reason)),
                || svc.list(&pending),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("Pending KYC", &page, COLUMNS);
            }
        }
        KycCommands::VerifyBank {
            id,
            reject,
            reason,
            force,
            json,
        } => {
            let verb = if reject { "Reject" } else { "Accept" };
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "kyc verify-bank",
                    resource: "kyc",
                    id: &id,
                    prompt: format!("{} bank details of submission {}?", verb, id),
                },
                force,
                json,
                || svc.verify_bank(&id, !reject, reason.as_deref()),
                || svc.get(&id),
            )
            .await?;
            if let (Some(submission), false) = (refreshed, json) {
                output::print_record(&submission);
            }
        }
    }

    Ok(())
}
