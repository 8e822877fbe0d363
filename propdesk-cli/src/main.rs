//! PropDesk CLI - trading-challenge admin console in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod output;

use commands::{
    auth, config, content, courses, dashboard, get_logger, kyc, log_event, logs, plans, referrals,
    security, stages, subadmins, support, transactions, users, withdrawals,
};
use propdesk_core::services::LogEvent;
use propdesk_core::Error;

/// PropDesk - trading-challenge admin console
#[derive(Parser)]
#[command(name = "pd", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (requests, statuses, swallowed failures)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, log out and manage the admin account
    Auth {
        #[command(subcommand)]
        command: auth::AuthCommands,
    },

    /// Platform overview
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Platform users
    Users {
        #[command(subcommand)]
        command: users::UsersCommands,
    },

    /// Sub-admin accounts and permissions
    Subadmins {
        #[command(subcommand)]
        command: subadmins::SubadminsCommands,
    },

    /// KYC review
    Kyc {
        #[command(subcommand)]
        command: kyc::KycCommands,
    },

    /// Challenge plans, add-ons, purchases and discounts
    Plans {
        #[command(subcommand)]
        command: plans::PlansCommands,
    },

    /// Challenge stages and trader progression
    Stages {
        #[command(subcommand)]
        command: stages::StagesCommands,
    },

    /// Transaction ledger
    Transactions {
        #[command(subcommand)]
        command: transactions::TransactionsCommands,
    },

    /// Payout requests
    Withdrawals {
        #[command(subcommand)]
        command: withdrawals::WithdrawalsCommands,
    },

    /// Sessions, violations and travel checks
    Security {
        #[command(subcommand)]
        command: security::SecurityCommands,
    },

    /// Support tickets
    Support {
        #[command(subcommand)]
        command: support::SupportCommands,
    },

    /// News, blogs and FAQs
    Content {
        #[command(subcommand)]
        command: content::ContentCommands,
    },

    /// Referral rewards
    Referrals {
        #[command(subcommand)]
        command: referrals::ReferralsCommands,
    },

    /// Education courses
    Courses {
        #[command(subcommand)]
        command: courses::CoursesCommands,
    },

    /// View and manage the local audit log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

impl Commands {
    /// Group name recorded in the audit log
    fn name(&self) -> &'static str {
        match self {
            Commands::Auth { .. } => "auth",
            Commands::Dashboard { .. } => "dashboard",
            Commands::Users { .. } => "users",
            Commands::Subadmins { .. } => "subadmins",
            Commands::Kyc { .. } => "kyc",
            Commands::Plans { .. } => "plans",
            Commands::Stages { .. } => "stages",
            Commands::Transactions { .. } => "transactions",
            Commands::Withdrawals { .. } => "withdrawals",
            Commands::Security { .. } => "security",
            Commands::Support { .. } => "support",
            Commands::Content { .. } => "content",
            Commands::Referrals { .. } => "referrals",
            Commands::Courses { .. } => "courses",
            Commands::Logs { .. } => "logs",
            Commands::Config { .. } => "config",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.debug { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let command = cli.command.name();
    let logger = get_logger();
    log_event(&logger, LogEvent::new("command_executed").with_command(command));

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("command_failed")
                    .with_command(command)
                    .with_error(e.to_string()),
            );
            output::error(&format!("{:#}", e));
            if matches!(e.downcast_ref::<Error>(), Some(Error::Unauthorized(_))) {
                eprintln!("Session missing or expired. Run `pd auth login`.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Auth { command } => auth::run(command).await,
        Commands::Dashboard { json } => dashboard::run(json).await,
        Commands::Users { command } => users::run(command).await,
        Commands::Subadmins { command } => subadmins::run(command).await,
        Commands::Kyc { command } => kyc::run(command).await,
        Commands::Plans { command } => plans::run(command).await,
        Commands::Stages { command } => stages::run(command).await,
        Commands::Transactions { command } => transactions::run(command).await,
        Commands::Withdrawals { command } => withdrawals::run(command).await,
        Commands::Security { command } => security::run(command).await,
        Commands::Support { command } => support::run(command).await,
        Commands::Content { command } => content::run(command).await,
        Commands::Referrals { command } => referrals::run(command).await,
        Commands::Courses { command } => courses::run(command).await,
        Commands::Logs { command } => logs::run(command),
        Commands::Config { command } => config::run(command),
    }
}
