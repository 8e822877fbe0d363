//! Plan commands - challenge plans, add-ons, purchases and college discounts

use anyhow::Result;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use propdesk_core::services::{DiscountInput, PlanInput};
use propdesk_core::ListQuery;

use super::{apply_mutation, get_context, print_json, with_spinner, ListArgs, MutationTarget};
use crate::output::{self, money, Column};

const PLAN_COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("Name", "name"),
    ("Price", "price"),
    ("Account size", "accountSize"),
    ("Active", "isActive"),
];

const ADDON_COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("Name", "name"),
    ("Price", "price"),
    ("Description", "description"),
];

const PURCHASE_COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("User", "user.email"),
    ("Plan", "plan.name"),
    ("Amount", "totalAmount"),
    ("Status", "status"),
    ("Date", "createdAt"),
];

const DISCOUNT_COLUMNS: &[Column] = &[
    ("ID", "_id"),
    ("College", "collegeName"),
    ("Code", "code"),
    ("Discount %", "discountPercentage"),
    ("Active", "isActive"),
];

/// Plan fields shared by create and update
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: Decimal,
    #[arg(long)]
    account_size: Option<Decimal>,
    /// Profit target, percent
    #[arg(long)]
    profit_target: Option<Decimal>,
    /// Maximum daily loss, percent
    #[arg(long)]
    max_daily_loss: Option<Decimal>,
    /// Maximum total loss, percent
    #[arg(long)]
    max_total_loss: Option<Decimal>,
    #[arg(long)]
    description: Option<String>,
    /// Create or leave the plan hidden from buyers
    #[arg(long)]
    inactive: bool,
}

impl From<PlanArgs> for PlanInput {
    fn from(args: PlanArgs) -> Self {
        PlanInput {
            name: args.name,
            price: args.price,
            account_size: args.account_size,
            profit_target_percent: args.profit_target,
            max_daily_loss_percent: args.max_daily_loss,
            max_total_loss_percent: args.max_total_loss,
            description: args.description,
            active: !args.inactive,
        }
    }
}

#[derive(Subcommand)]
pub enum PlansCommands {
    /// List challenge plans
    List {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Create a plan
    Create {
        #[command(flatten)]
        plan: PlanArgs,
        #[arg(long)]
        json: bool,
    },
    /// Replace a plan's fields
    Update {
        id: String,
        #[command(flatten)]
        plan: PlanArgs,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Delete a plan
    Delete {
        id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// List add-ons
    Addons {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Create an add-on
    AddonCreate {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Delete an add-on
    AddonDelete {
        id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// List purchases
    Purchases {
        #[command(flatten)]
        list: ListArgs,
        /// Filter by status (pending, completed, failed)
        #[arg(long)]
        status: Option<String>,
    },
    /// Purchase statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// List college discount codes
    Discounts {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Create a college discount code
    DiscountCreate {
        #[arg(long)]
        college: String,
        #[arg(long)]
        code: String,
        /// Discount, percent
        #[arg(long)]
        percent: Decimal,
        #[arg(long)]
        inactive: bool,
        #[arg(long)]
        json: bool,
    },
    /// Delete a college discount code
    DiscountDelete {
        id: String,
        #[arg(long, short)]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Discount usage statistics
    DiscountStats {
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(command: PlansCommands) -> Result<()> {
    let ctx = get_context()?;
    let svc = &ctx.purchase_service;
    let query = ListQuery::new(ctx.config.page_size);

    match command {
        PlansCommands::List { list } => {
            let page = with_spinner("Loading plans...", svc.plans(&list.query(&ctx))).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("Plans", &page, PLAN_COLUMNS);
        }
        PlansCommands::Create { plan, json } => {
            let created = svc.create_plan(&plan.into()).await?;
            if json {
                return print_json(&created);
            }
            output::success("✓ Plan created");
        }
        PlansCommands::Update {
            id,
            plan,
            force,
            json,
        } => {
            let input = PlanInput::from(plan);
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "plans update",
                    resource: "plan",
                    id: &id,
                    prompt: format!("Update plan {} ({})?", input.name, id),
                },
                force,
                json,
                || svc.update_plan(&id, &input),
                || svc.plans(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("Plans", &page, PLAN_COLUMNS);
            }
        }
        PlansCommands::Delete { id, force, json } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "plans delete",
                    resource: "plan",
                    id: &id,
                    prompt: format!("Delete plan {}?", id),
                },
                force,
                json,
                || svc.delete_plan(&id),
                || svc.plans(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("Plans", &page, PLAN_COLUMNS);
            }
        }
        PlansCommands::Addons { list } => {
            let page = with_spinner("Loading add-ons...", svc.addons(&list.query(&ctx))).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("Add-ons", &page, ADDON_COLUMNS);
        }
        PlansCommands::AddonCreate {
            name,
            price,
            description,
            json,
        } => {
            let created = svc.create_addon(&name, price, description.as_deref()).await?;
            if json {
                return print_json(&created);
            }
            output::success(&format!("✓ Add-on {} created", name.trim()));
        }
        PlansCommands::AddonDelete { id, force, json } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "plans addon-delete",
                    resource: "addon",
                    id: &id,
                    prompt: format!("Delete add-on {}?", id),
                },
                force,
                json,
                || svc.delete_addon(&id),
                || svc.addons(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("Add-ons", &page, ADDON_COLUMNS);
            }
        }
        PlansCommands::Purchases { list, status } => {
            let query = list.query(&ctx).filter_opt("status", status.as_deref());
            let page = with_spinner("Loading purchases...", svc.purchases(&query)).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("Purchases", &page, PURCHASE_COLUMNS);
        }
        PlansCommands::Stats { json } => {
            let stats = with_spinner("Aggregating purchases...", svc.purchase_stats()).await?;
            if json {
                return print_json(&stats);
            }
            let mut table = output::create_table();
            table.set_header(vec!["Metric", "Value"]);
            table.add_row(vec!["Purchases".to_string(), stats.total_purchases_count.to_string()]);
            table.add_row(vec!["Completed".to_string(), stats.completed_count.to_string()]);
            table.add_row(vec!["Unique buyers".to_string(), stats.unique_user_ids.to_string()]);
            table.add_row(vec!["Accounts per buyer".to_string(), stats.avg_accounts_per_user.clone()]);
            table.add_row(vec!["Revenue".to_string(), money(stats.purchase_total_revenue)]);
            println!("{}", table);

            if !stats.by_plan.is_empty() {
                let mut plans = output::create_table();
                plans.set_header(vec!["Plan", "Purchases"]);
                for (plan, count) in &stats.by_plan {
                    plans.add_row(vec![plan.clone(), count.to_string()]);
                }
                println!("{}", plans);
            }
        }
        PlansCommands::Discounts { list } => {
            let page = with_spinner("Loading discounts...", svc.discounts(&list.query(&ctx))).await?;
            if list.json {
                return print_json(&page);
            }
            output::print_page("College discounts", &page, DISCOUNT_COLUMNS);
        }
        PlansCommands::DiscountCreate {
            college,
            code,
            percent,
            inactive,
            json,
        } => {
            let input = DiscountInput {
                college_name: college,
                code,
                discount_percent: percent,
                active: !inactive,
            };
            let created = svc.create_discount(&input).await?;
            if json {
                return print_json(&created);
            }
            output::success(&format!("✓ Discount {} created", input.code.trim().to_uppercase()));
        }
        PlansCommands::DiscountDelete { id, force, json } => {
            let refreshed = apply_mutation(
                MutationTarget {
                    command: "plans discount-delete",
                    resource: "discount",
                    id: &id,
                    prompt: format!("Delete discount {}?", id),
                },
                force,
                json,
                || svc.delete_discount(&id),
                || svc.discounts(&query),
            )
            .await?;
            if let (Some(page), false) = (refreshed, json) {
                output::print_page("College discounts", &page, DISCOUNT_COLUMNS);
            }
        }
        PlansCommands::DiscountStats { json } => {
            let stats = with_spinner("Loading discount stats...", svc.discount_stats()).await?;
            if json {
                return print_json(&stats);
            }
            output::print_stats("Discount usage", &stats);
        }
    }

    Ok(())
}
