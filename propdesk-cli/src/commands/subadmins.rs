//! Sub-admin commands

use anyhow::Result;
use clap::Subcommand;
use dialoguer::Password;
use serde_json::json;

use propdesk_core::services::SubAdminInput;
use propdesk_core::ListQuery;

use super::{apply_mutation, get_context, print_json, with_spinner, ListArgs, MutationTarget};
use crate::output::{self, Column};

const COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("Name", "name"),
    ("Email", "email"),
    ("Active", "isActive"),
    ("Created", "createdAt"),
];

#[derive(Subcommand)]
pub enum SubadminsCommands {
    /// List sub-admins
    List {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Create a sub-admin (password is prompted)
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Page permissions, comma separated
        #[arg(long, value_delimiter = ',')]
        permissions: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Change name, email or active flag
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        active: Option<bool>,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Delete a sub-admin
    Delete {
        id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show a sub-admin's permissions
    Permissions {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Replace a sub-admin's permissions
    SetPermissions {
        id: String,
        /// Page permissions, comma separated
        #[arg(value_delimiter = ',', required = true)]
        permissions: Vec<String>,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(command: SubadminsCommands) -> Result<()> {
    let ctx = get_context()?;
    let svc = &ctx.subadmin_service;
    let query = ListQuery::new(ctx.config.page_size);

    match command {
        SubadminsCommands::List { list } => {
            let page = with_spinner("Loading sub-admins...", svc.list(&list.query(&ctx))).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("Sub-admins", &page, COLUMNS);
        }
        SubadminsCommands::Create {
            name,
            email,
            permissions,
            json,
        } => {
            let password = Password::new().with_prompt("Password").interact()?;
            let confirm_password = Password::new().with_prompt("Confirm password").interact()?;
            let input = SubAdminInput {
                name,
                email,
                password,
                confirm_password,
                permissions,
            };
            let created = svc.create(&input).await?;
            if json {
                return print_json(&created);
            }
            output::success(&format!("✓ Sub-admin {} created", input.email.to_lowercase()));
        }
        SubadminsCommands::Update {
            id,
            name,
            email,
            active,
            force,
            json,
        } => {
            let mut changes = json!({});
            if let Some(name) = name {
                changes["name"] = json!(name);
            }
            if let Some(email) = email {
                changes["email"] = json!(email.trim().to_lowercase());
            }
            if let Some(active) = active {
                changes["isActive"] = json!(active);
            }
            if changes.as_object().map(|m| m.is_empty()).unwrap_or(true) {
                output::warning("Nothing to update");
                return Ok(());
            }
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "subadmins update",
                    resource: "subadmin",
                    id: &id,
                    prompt: format!("Update sub-admin {}?", id),
                },
                force,
                json,
                || svc.update(&id, changes.clone()),
                || svc.list(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("Sub-admins", &page, COLUMNS);
            }
        }
        SubadminsCommands::Delete { id, force, json } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "subadmins delete",
                    resource: "subadmin",
                    id: &id,
                    prompt: format!("Delete sub-admin {}?", id),
                },
                force,
                json,
                || svc.delete(&id),
                || svc.list(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("Sub-admins", &page, COLUMNS);
            }
        }
        SubadminsCommands::Permissions { id, json } => {
            let permissions = svc.permissions(&id).await?;
            if json {
                return print_json(&permissions);
            }
            output::print_record(&permissions);
        }
        SubadminsCommands::SetPermissions {
            id,
            permissions,
            force,
            json,
        } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "subadmins set-permissions",
                    resource: "subadmin",
                    id: &id,
                    prompt: format!("Replace permissions of {} with [{}]?", id, permissions.join(", ")),
                },
                force,
                json,
                || svc.set_permissions(&id, &permissions),
                || svc.permissions(&id),
            )
            .await?;
            if let (Some(current), false) = (refreshed, json) {
                output::print_record(&current);
            }
        }
    }

    Ok(())
}
