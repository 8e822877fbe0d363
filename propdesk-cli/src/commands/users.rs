//! Users commands - list, inspect, block and browse platform users

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Input, Select};

use propdesk_core::domain::fields::{record_id, text_or};
use propdesk_core::domain::filter::{search_filter, USER_SEARCH_FIELDS};
use propdesk_core::domain::UserStatus;
use propdesk_core::services::users::USERS_PATH;
use propdesk_core::{AdminContext, ListQuery};

use super::{apply_mutation, get_context, print_json, with_spinner, ListArgs, MutationTarget};
use crate::output::{self, Column};

const COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("Name", "name"),
    ("Email", "email"),
    ("Status", "status"),
    ("KYC", "kycStatus"),
    ("Joined", "createdAt"),
];

#[derive(Subcommand)]
pub enum UsersCommands {
    /// List users
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by status (Active, Blocked)
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one user
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Block a user
    Block {
        id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Unblock a user
    Unblock {
        id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Delete a user
    Delete {
        id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Page through users interactively
    Browse,
}

async fn set_status(ctx: &AdminContext, id: &str, status: UserStatus, force: bool, json: bool) -> Result<()> {
    let verb = match status {
        UserStatus::Blocked => "Block",
        UserStatus::Active => "Unblock",
    };
    let refreshed = apply_mutation(
        MutationTarget {
            command: "users set-status",
            resource: "user",
            id,
            prompt: format!("{} user {}?", verb, id),
        },
        force,
        json,
        || ctx.user_service.set_status(id, status),
        || ctx.user_service.get(id),
    )
    .await?;
    if let (Some(user), false) = (refreshed, json) {
        println!("Status is now {}", output::status(&text_or(&user, "status", "-")));
    }
    Ok(())
}

pub async fn run(command: UsersCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        UsersCommands::List { list, status } => {
            let query = list.query(&ctx).filter_opt("status", status.as_deref());
            let mut page = with_spinner("Loading users...", ctx.user_service.list(&query)).await?;
            // Older backends ignore `search`
            page.items = search_filter(&page.items, USER_SEARCH_FIELDS, &query.search);
            if list.json {
                return print_json(&page);
            }
            output::print_page("Users", &page, COLUMNS);
        }
        UsersCommands::Show { id, json } => {
            let user = ctx.user_service.get(&id).await?;
            if json {
                return print_json(&user);
            }
            output::print_record(&user);
        }
        UsersCommands::Block { id, force, json } => {
            set_status(&ctx, &id, UserStatus::Blocked, force, json).await?;
        }
        UsersCommands::Unblock { id, force, json } => {
            set_status(&ctx, &id, UserStatus::Active, force, json).await?;
        }
        UsersCommands::Delete { id, force, json } => {
            let query = ListQuery::new(ctx.config.page_size);
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "users delete",
                    resource: "user",
                    id: &id,
                    prompt: format!("Delete user {}? This cannot be undone.", id),
                },
                force,
                json,
                || ctx.user_service.delete(&id),
                || ctx.user_service.list(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("Users", &page, COLUMNS);
            }
        }
        UsersCommands::Browse => browse(&ctx).await?,
    }

    Ok(())
}

/// Interactive pager over `/users` driven by the list controller
async fn browse(ctx: &AdminContext) -> Result<()> {
    let list = ctx.list_controller(USERS_PATH);
    let mut page = list.refresh().await?;

    loop {
        if let Some(current) = &page {
            output::print_page("Users", current, COLUMNS);
        }
        let query = list.query();
        if !query.search.is_empty() || !query.filters.is_empty() {
            println!(
                "{}",
                format!("search: '{}'  filters: {:?}", query.search, query.filters).dimmed()
            );
        }

        let actions = [
            "Next page",
            "Previous page",
            "Search",
            "Filter by status",
            "Rows per page",
            "Toggle block on a user",
            "Quit",
        ];
        let choice = Select::new()
            .with_prompt("Action")
            .items(&actions)
            .default(0)
            .interact()?;

        let next = match choice {
            0 => list.next_page().await,
            1 => list.prev_page().await,
            2 => {
                let text: String = Input::new()
                    .with_prompt("Search")
                    .allow_empty(true)
                    .interact_text()?;
                list.type_search(&text).await
            }
            3 => {
                let statuses = ["all", "Active", "Blocked"];
                let pick = Select::new().items(&statuses).default(0).interact()?;
                list.set_filter("status", statuses[pick]).await
            }
            4 => {
                let limit: u32 = Input::new()
                    .with_prompt("Rows per page")
                    .default(list.query().limit)
                    .interact_text()?;
                list.set_limit(limit).await
            }
            5 => {
                let Some(current) = list.current() else { continue };
                let labels: Vec<String> = current
                    .items
                    .iter()
                    .map(|u| format!("{} ({})", text_or(u, "email", "-"), text_or(u, "status", "-")))
                    .collect();
                if labels.is_empty() {
                    continue;
                }
                let pick = Select::new().items(&labels).default(0).interact()?;
                let user = &current.items[pick];
                let Some(id) = record_id(user) else { continue };
                let target = text_or(user, "status", "Active")
                    .parse::<UserStatus>()
                    .unwrap_or(UserStatus::Active)
                    .toggled();
                apply_mutation(
                    MutationTarget {
                        command: "users browse",
                        resource: "user",
                        id: &id,
                        prompt: format!("Set {} to {}?", text_or(user, "email", &id), target),
                    },
                    false,
                    false,
                    || ctx.user_service.set_status(&id, target),
                    || list.refresh(),
                )
                .await
                .map(Option::flatten)
                .map_err(|e| propdesk_core::Error::Other(e.to_string()))
            }
            _ => break,
        };

        match next {
            Ok(Some(p)) => page = Some(p),
            Ok(None) => {}
            Err(e) => output::error(&e.to_string()),
        }
    }

    Ok(())
}
