//! CLI command implementations

pub mod auth;
pub mod config;
pub mod content;
pub mod courses;
pub mod dashboard;
pub mod kyc;
pub mod logs;
pub mod plans;
pub mod referrals;
pub mod security;
pub mod stages;
pub mod subadmins;
pub mod support;
pub mod transactions;
pub mod users;
pub mod withdrawals;

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value as JsonValue;

use propdesk_core::services::{confirm_and_mutate, Confirmer, LogEvent, LoggingService, MutationOutcome};
use propdesk_core::{AdminContext, ListQuery, OperationResult};

use crate::output;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (never blocks a command)
pub fn get_logger() -> Option<LoggingService> {
    let dir = get_propdesk_dir().ok()?;
    LoggingService::new(&dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// PropDesk directory from `PROPDESK_DIR` or `~/.propdesk`
pub fn get_propdesk_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("PROPDESK_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".propdesk"))
        .ok_or_else(|| anyhow!("Could not find home directory; set PROPDESK_DIR"))
}

/// Build the admin context
pub fn get_context() -> Result<AdminContext> {
    let dir = get_propdesk_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create PropDesk directory: {:?}", dir))?;
    AdminContext::new(&dir).context("Failed to initialize PropDesk context")
}

/// Paging and search flags shared by list commands
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Page number
    #[arg(long, default_value = "1")]
    pub page: u32,
    /// Rows per page (defaults to the configured page size)
    #[arg(long)]
    pub limit: Option<u32>,
    /// Free-text search
    #[arg(long, short)]
    pub search: Option<String>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn query(&self, ctx: &AdminContext) -> ListQuery {
        let mut query = ListQuery::new(self.limit.unwrap_or(ctx.config.page_size)).page(self.page);
        if let Some(search) = &self.search {
            query = query.search(search.trim());
        }
        query
    }
}

/// Confirmation through a terminal prompt; `--force` skips it
pub struct PromptConfirmer {
    force: bool,
}

impl PromptConfirmer {
    pub fn new(force: bool) -> Self {
        Self { force }
    }
}

impl Confirmer for PromptConfirmer {
    fn confirm(&self, prompt: &str) -> bool {
        if self.force {
            return true;
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

/// Run a future behind a spinner when stdout is a terminal
pub async fn with_spinner<F, T>(message: &str, future: F) -> T
where
    F: Future<Output = T>,
{
    if atty::isnt(atty::Stream::Stdout) {
        return future.await;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = future.await;
    spinner.finish_and_clear();
    result
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// What a guarded mutation touches, for the prompt and the audit log
pub struct MutationTarget<'a> {
    pub command: &'a str,
    pub resource: &'a str,
    pub id: &'a str,
    pub prompt: String,
}

/// Confirm, mutate, refetch, and report.
///
/// Returns the refetched value, or `None` when the operator declined.
pub async fn apply_mutation<M, MF, R, RF, T>(
    target: MutationTarget<'_>,
    force: bool,
    json: bool,
    mutate: M,
    refetch: R,
) -> Result<Option<T>>
where
    M: FnOnce() -> MF,
    MF: Future<Output = propdesk_core::domain::result::Result<JsonValue>>,
    R: FnOnce() -> RF,
    RF: Future<Output = propdesk_core::domain::result::Result<T>>,
{
    let confirmer = PromptConfirmer::new(force || json);
    let outcome = confirm_and_mutate(&confirmer, &target.prompt, mutate, refetch).await;
    let logger = get_logger();

    match outcome {
        MutationOutcome::Cancelled => {
            println!("{}", "Cancelled".dimmed());
            Ok(None)
        }
        MutationOutcome::Failed(e) => {
            log_event(
                &logger,
                LogEvent::new("mutation_failed")
                    .with_command(target.command)
                    .with_resource(target.resource, target.id)
                    .with_error(e.to_string()),
            );
            Err(e.into())
        }
        MutationOutcome::Applied { response, refreshed } => {
            log_event(
                &logger,
                LogEvent::new("mutation_applied")
                    .with_command(target.command)
                    .with_resource(target.resource, target.id),
            );
            if json {
                print_json(&OperationResult::ok(response))?;
            } else {
                let message = response
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("Done");
                output::success(&format!("✓ {}", message));
            }
            match refreshed {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    output::warning(&format!("Change applied, but reloading failed: {}", e));
                    Ok(None)
                }
            }
        }
    }
}
