//! Support commands - tickets, replies and assignment

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use serde_json::Value as JsonValue;

use propdesk_core::domain::fields::text_or;
use propdesk_core::domain::TicketStatus;

use super::{apply_mutation, get_context, print_json, with_spinner, ListArgs, MutationTarget};
use crate::output::{self, Column};

const COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("Subject", "subject"),
    ("User", "user.email"),
    ("Priority", "priority"),
    ("Status", "status"),
    ("Updated", "updatedAt"),
];

#[derive(Subcommand)]
pub enum SupportCommands {
    /// List tickets
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by status (open, in-progress, resolved, closed)
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// Show a ticket and its conversation
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Reply to a ticket
    Reply {
        id: String,
        message: String,
        /// Also move the ticket to this status
        #[arg(long)]
        status: Option<TicketStatus>,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Assign a ticket to an admin
    Assign {
        id: String,
        admin_id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Close a ticket
    Close {
        id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
}

fn print_ticket(ticket: &JsonValue) {
    println!(
        "{}  [{}]",
        text_or(ticket, "subject", "(no subject)").bold(),
        output::status(&text_or(ticket, "status", "-"))
    );
    println!("{}", text_or(ticket, "user.email", "-").dimmed());
    println!();
    println!("{}", text_or(ticket, "message", ""));

    let replies = ticket
        .get("replies")
        .and_then(|r| r.as_array())
        .cloned()
        .unwrap_or_default();
    for reply in &replies {
        let author = if reply.get("isAdmin").and_then(|a| a.as_bool()).unwrap_or(false) {
            "admin".cyan()
        } else {
            "user".normal()
        };
        println!();
        println!("{} {}", author, text_or(reply, "createdAt", "").dimmed());
        println!("{}", text_or(reply, "message", ""));
    }
}

pub async fn run(command: SupportCommands) -> Result<()> {
    let ctx = get_context()?;
    let svc = &ctx.support_service;

    match command {
        SupportCommands::List {
            list,
            status,
            priority,
        } => {
            let query = list
                .query(&ctx)
                .filter_opt("status", status.as_deref())
                .filter_opt("priority", priority.as_deref());
            let page = with_spinner("Loading tickets...", svc.list(&query)).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("Tickets", &page, COLUMNS);
        }
        SupportCommands::Show { id, json } => {
            let ticket = svc.get(&id).await?;
            if json {
                return print_json(&ticket);
            }
            print_ticket(&ticket);
        }
        SupportCommands::Reply {
            id,
            message,
            status,
            force,
            json,
        } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "support reply",
                    resource: "ticket",
                    id: &id,
                    prompt: format!("Send reply to ticket {}?", id),
                },
                force,
                json,
                || svc.reply(&id, &message, status),
                || svc.get(&id),
            )
            .await?;
            if let (Some(ticket), false) = (refreshed, json) {
                print_ticket(&ticket);
            }
        }
        SupportCommands::Assign {
            id,
            admin_id,
            force,
            json,
        } => {
            apply_mutation(
                MutationTarget {
                    command: "support assign",
                    resource: "ticket",
                    id: &id,
                    prompt: format!("Assign ticket {} to {}?", id, admin_id),
                },
                force,
                json,
                || svc.assign(&id, &admin_id),
                || svc.get(&id),
            )
            .await?;
        }
        SupportCommands::Close { id, force, json } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "support close",
                    resource: "ticket",
                    id: &id,
                    prompt: format!("Close ticket {}?", id),
                },
                force,
                json,
                || svc.set_status(&id, TicketStatus::Closed),
                || svc.get(&id),
            )
            .await?;
            if let (Some(ticket), false) = (refreshed, json) {
                println!("Status is now {}", output::status(&text_or(&ticket, "status", "-")));
            }
        }
    }

    Ok(())
}
