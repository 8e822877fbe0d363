//! Transaction commands - ledger, stats and CSV export

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use propdesk_core::services::{LogEvent, TransactionSummary};
use propdesk_core::ListQuery;

use super::{get_context, get_logger, log_event, print_json, with_spinner, ListArgs};
use crate::output::{self, money, Column};

const COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("User", "user.email"),
    ("Type", "type"),
    ("Amount", "amount"),
    ("Status", "status"),
    ("Date", "createdAt"),
];

#[derive(Subcommand)]
pub enum TransactionsCommands {
    /// List transactions
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by type (deposit, withdrawal, purchase)
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Ledger statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Download the ledger as CSV
    Export {
        /// Directory to write transactions_export.csv into
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(command: TransactionsCommands) -> Result<()> {
    let ctx = get_context()?;
    let svc = &ctx.transaction_service;

    match command {
        TransactionsCommands::List { list, kind, status } => {
            let query = list
                .query(&ctx)
                .filter_opt("type", kind.as_deref())
                .filter_opt("status", status.as_deref());
            let page = with_spinner("Loading transactions...", svc.list(&query)).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("Transactions", &page, COLUMNS);
            if !page.items.is_empty() {
                let summary = TransactionSummary::from_items(&page.items);
                output::info(&format!(
                    "This page: {} transactions, {} total, {} completed",
                    summary.count,
                    money(summary.total_amount),
                    summary.completed
                ));
            }
        }
        TransactionsCommands::Stats { json } => {
            let stats = with_spinner("Loading stats...", svc.stats()).await?;
            if json {
                return print_json(&stats);
            }
            output::print_stats("Transaction stats", &stats);
        }
        TransactionsCommands::Export {
            dir,
            kind,
            status,
            search,
            json,
        } => {
            let query = ListQuery::new(ctx.config.page_size)
                .search(search.unwrap_or_default().trim())
                .filter_opt("type", kind.as_deref())
                .filter_opt("status", status.as_deref());
            let result = with_spinner("Exporting...", svc.export(&query, &dir)).await?;
            log_event(
                &get_logger(),
                LogEvent::new("transactions_exported")
                    .with_command("transactions export")
                    .with_resource("file", result.path.display().to_string()),
            );
            if json {
                return print_json(&result);
            }
            let rows = result
                .rows
                .map(|n| format!("{} rows", n))
                .unwrap_or_else(|| "unknown row count".to_string());
            output::success(&format!(
                "✓ Exported {} ({} bytes) to {}",
                rows,
                result.bytes,
                result.path.display()
            ));
        }
    }

    Ok(())
}
