//! Config command - show and change settings.json

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;

use propdesk_core::config::{Config, API_URL_ENV, MAX_DEBOUNCE_MS, MIN_DEBOUNCE_MS};

use super::{get_propdesk_dir, print_json};
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the admin API base URL
    SetUrl { url: String },
    /// Set the default page size
    SetPageSize { size: u32 },
    /// Set the search debounce in milliseconds
    SetDebounce { ms: u64 },
    /// Treat 404 from an endpoint as an empty list (or stop doing so)
    NotFoundEmpty {
        path: String,
        /// Remove the endpoint instead of adding it
        #[arg(long)]
        remove: bool,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let dir = get_propdesk_dir()?;
    std::fs::create_dir_all(&dir)?;
    let mut config = Config::load(&dir)?;

    match command {
        ConfigCommands::Show { json } => {
            if json {
                return print_json(&serde_json::json!({
                    "baseUrl": config.base_url,
                    "timeoutSecs": config.timeout.as_secs(),
                    "pageSize": config.page_size,
                    "searchDebounceMs": config.search_debounce_ms,
                    "notFoundAsEmpty": config.not_found_as_empty,
                    "settingsPath": dir.join("settings.json").to_string_lossy(),
                }));
            }

            let mut table = output::create_table();
            table.set_header(vec!["Setting", "Value"]);
            table.add_row(vec!["API URL".to_string(), config.base_url.clone()]);
            table.add_row(vec!["Timeout".to_string(), format!("{}s", config.timeout.as_secs())]);
            table.add_row(vec!["Page size".to_string(), config.page_size.to_string()]);
            table.add_row(vec![
                "Search debounce".to_string(),
                format!("{}ms", config.search_debounce_ms),
            ]);
            table.add_row(vec![
                "404 reads as empty".to_string(),
                config.not_found_as_empty.join("\n"),
            ]);
            println!("{}", table);
            if std::env::var(API_URL_ENV).is_ok() {
                println!("{}", format!("API URL overridden by {}", API_URL_ENV).dimmed());
            }
            println!("{}", format!("Settings: {}", dir.join("settings.json").display()).dimmed());
            return Ok(());
        }
        ConfigCommands::SetUrl { url } => {
            let parsed = url::Url::parse(url.trim())?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!("API URL must use http or https");
            }
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }
        ConfigCommands::SetPageSize { size } => {
            if size == 0 {
                bail!("Page size must be at least 1");
            }
            config.page_size = size;
        }
        ConfigCommands::SetDebounce { ms } => {
            let clamped = ms.clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS);
            if clamped != ms {
                output::warning(&format!(
                    "Debounce must be between {} and {}ms; using {}ms",
                    MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS, clamped
                ));
            }
            config.search_debounce_ms = clamped;
        }
        ConfigCommands::NotFoundEmpty { path, remove } => {
            let path = path.trim().trim_end_matches('/').to_string();
            if remove {
                config.not_found_as_empty.retain(|p| p.trim_end_matches('/') != path);
            } else if !config.treats_not_found_as_empty(&path) {
                config.not_found_as_empty.push(path);
            }
        }
    }

    config.save(&dir)?;
    output::success("✓ Settings saved");
    Ok(())
}
