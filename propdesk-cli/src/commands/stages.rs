//! Stage commands - challenge configuration and trader progression

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::Value as JsonValue;

use propdesk_core::services::stages::stage_breakdown;
use propdesk_core::ListQuery;

use super::{apply_mutation, get_context, print_json, with_spinner, ListArgs, MutationTarget};
use crate::output::{self, Column};

const USER_COLUMNS: &[Column] = &[
    ("Account", "_id"),
    ("User", "user.email"),
    ("Plan", "plan.name"),
    ("Stage", "currentStage"),
    ("Status", "status"),
    ("Balance", "currentBalance"),
];

const TRADE_COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("Symbol", "symbol"),
    ("Side", "side"),
    ("Volume", "volume"),
    ("Profit", "profit"),
    ("Closed", "closeTime"),
];

#[derive(Subcommand)]
pub enum StagesCommands {
    /// Show the stage configuration
    Config {
        #[arg(long)]
        json: bool,
    },
    /// Replace the stage configuration from a JSON file
    SetConfig {
        file: PathBuf,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// List challenge accounts with their stage
    Users {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by stage
        #[arg(long)]
        stage: Option<String>,
    },
    /// Move an account to the next (or a given) stage
    Advance {
        account_id: String,
        /// Target stage; the backend picks the next one when omitted
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Reset an account's daily loss counter
    ResetDailyLoss {
        account_id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Trades of one account
    Trades {
        account_id: String,
        #[command(flatten)]
        list: ListArgs,
    },
}

pub async fn run(command: StagesCommands) -> Result<()> {
    let ctx = get_context()?;
    let svc = &ctx.stage_service;
    let query = ListQuery::new(ctx.config.page_size);

    match command {
        StagesCommands::Config { json } => {
            let config = with_spinner("Loading stage config...", svc.config()).await?;
            if json {
                return print_json(&config);
            }
            output::print_stats("Stage configuration", &config);
        }
        StagesCommands::SetConfig { file, force, json } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let config: JsonValue = serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", file.display()))?;
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "stages set-config",
                    resource: "stage-config",
                    id: "-",
                    prompt: format!("Replace the stage configuration with {}?", file.display()),
                },
                force,
                json,
                || svc.update_config(config),
                || svc.config(),
            )
            .await?;
            if let (Some(config), false) = (refreshed, json) {
                output::print_stats("Stage configuration", &config);
            }
        }
        StagesCommands::Users { list, stage } => {
            let query = list.query(&ctx).filter_opt("stage", stage.as_deref());
            let page = with_spinner("Loading accounts...", svc.users(&query)).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("Challenge accounts", &page, USER_COLUMNS);
            let breakdown = stage_breakdown(&page.items);
            if breakdown.len() > 1 {
                let summary: Vec<String> = breakdown
                    .iter()
                    .map(|(stage, count)| format!("{}: {}", stage, count))
                    .collect();
                output::info(&summary.join("  "));
            }
        }
        StagesCommands::Advance {
            account_id,
            to,
            notes,
            force,
            json,
        } => {
            let target = to.as_deref().unwrap_or("the next stage");
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "stages advance",
                    resource: "account",
                    id: &account_id,
                    prompt: format!("Advance account {} to {}?", account_id, target),
                },
                force,
                json,
                || svc.advance(&account_id, to.as_deref(), notes.as_deref()),
                || svc.users(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("Challenge accounts", &page, USER_COLUMNS);
            }
        }
        StagesCommands::ResetDailyLoss {
            account_id,
            force,
            json,
        } => {
            apply_mutation(
                MutationTarget {
                    command: "stages reset-daily-loss",
                    resource: "account",
                    id: &account_id,
                    prompt: format!("Reset the daily loss of account {}?", account_id),
                },
                force,
                json,
                || svc.reset_daily_loss(&account_id),
                || svc.users(&query),
            )
            .await?;
        }
        StagesCommands::Trades { account_id, list } => {
            let page = with_spinner("Loading trades...", svc.trades(&account_id, &list.query(&ctx))).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("Trades", &page, TRADE_COLUMNS);
        }
    }

    Ok(())
}
