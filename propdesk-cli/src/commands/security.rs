//! Security commands

use anyhow::Result;
use clap::Subcommand;

use propdesk_core::ListQuery;

use super::{apply_mutation, get_context, print_json, with_spinner, ListArgs, MutationTarget};
use crate::output::{self, Column};

const SESSION_COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("User", "user.email"),
    ("IP", "ipAddress"),
    ("Location", "location"),
    ("Device", "device"),
    ("Last seen", "lastActivity"),
];

const VIOLATION_COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("User", "user.email"),
    ("Type", "type"),
    ("Severity", "severity"),
    ("Status", "status"),
    ("Detected", "createdAt"),
];

#[derive(Subcommand)]
pub enum SecurityCommands {
    /// Security overview
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Active user sessions
    Sessions {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Detected violations
    Violations {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        status: Option<String>,
    },
    /// Confirm a user's login location as legitimate travel
    VerifyTravel {
        user_id: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Resolve a violation
    Resolve {
        id: String,
        /// Resolution note
        #[arg(long)]
        resolution: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(command: SecurityCommands) -> Result<()> {
    let ctx = get_context()?;
    let svc = &ctx.security_service;
    let query = ListQuery::new(ctx.config.page_size);

    match command {
        SecurityCommands::Stats { json } => {
            let stats = with_spinner("Loading security stats...", svc.stats()).await?;
            if json {
                return print_json(&stats);
            }
            output::print_stats("Security", &stats);
        }
        SecurityCommands::Sessions { list } => {
            let page = with_spinner("Loading sessions...", svc.sessions(&list.query(&ctx))).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("Sessions", &page, SESSION_COLUMNS);
        }
        SecurityCommands::Violations { list, status } => {
            let query = list.query(&ctx).filter_opt("status", status.as_deref());
            let page = with_spinner("Loading violations...", svc.violations(&query)).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("Violations", &page, VIOLATION_COLUMNS);
        }
        SecurityCommands::VerifyTravel {
            user_id,
            location,
            notes,
            force,
            json,
        } => {
            apply_mutation(
                MutationTarget {
                    command: "security verify-travel",
                    resource: "user",
                    id: &user_id,
                    prompt: format!("Mark {} as verified travel for user {}?", location, user_id),
                },
                force,
                json,
                || svc.verify_travel(&user_id, &location, notes.as_deref()),
                || svc.stats(),
            )
            .await?;
        }
        SecurityCommands::Resolve {
            id,
            resolution,
            force,
            json,
        } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "security resolve",
                    resource: "violation",
                    id: &id,
                    prompt: format!("Resolve violation {}?", id),
                },
                force,
                json,
                || svc.resolve_violation(&id, &resolution),
                || svc.violations(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("Violations", &page, VIOLATION_COLUMNS);
            }
        }
    }

    Ok(())
}
