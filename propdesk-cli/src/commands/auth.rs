//! Auth commands - login, logout, password flows and profile

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Input, Password};
use serde_json::json;

use super::{get_context, print_json, with_spinner};
use crate::output;

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Log in and store the session
    Login {
        /// Admin email
        #[arg(long)]
        email: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long, env = "PROPDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Log out and forget the session
    Logout,
    /// Exchange the refresh token for a new access token
    Refresh,
    /// Email a one-time password for a reset
    ForgotPassword {
        email: String,
    },
    /// Check a one-time password
    VerifyOtp {
        email: String,
        otp: String,
    },
    /// Set a new password with a one-time password
    ResetPassword {
        email: String,
        otp: String,
    },
    /// Change the password of the logged-in admin
    ChangePassword,
    /// Show or update the admin profile
    Profile {
        /// New display name
        #[arg(long)]
        name: Option<String>,
        /// New email
        #[arg(long)]
        email: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the stored session
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// New password typed twice; the service checks both match
fn prompt_new_password() -> Result<(String, String)> {
    let password = Password::new().with_prompt("New password").interact()?;
    let confirmation = Password::new().with_prompt("Confirm new password").interact()?;
    Ok((password, confirmation))
}

pub async fn run(command: AuthCommands) -> Result<()> {
    let ctx = get_context()?;
    let auth = &ctx.auth_service;

    match command {
        AuthCommands::Login { email, password } => {
            let email = match email {
                Some(e) => e,
                None => Input::new().with_prompt("Email").interact_text()?,
            };
            let password = match password {
                Some(p) => p,
                None => Password::new().with_prompt("Password").interact()?,
            };
            let session = with_spinner("Logging in...", auth.login(&email, &password))
                .await
                .context("Login failed")?;
            output::success(&format!(
                "✓ Logged in as {}",
                session.admin_label().unwrap_or(email)
            ));
        }
        AuthCommands::Logout => {
            auth.logout().await?;
            output::success("✓ Logged out");
        }
        AuthCommands::Refresh => {
            let session = auth.refresh_token().await?;
            match session.expires_at() {
                Some(exp) => output::success(&format!("✓ Token refreshed, valid until {}", exp.format("%Y-%m-%d %H:%M UTC"))),
                None => output::success("✓ Token refreshed"),
            }
        }
        AuthCommands::ForgotPassword { email } => {
            auth.forgot_password(&email).await?;
            output::info(&format!("A one-time password was sent to {}", email));
        }
        AuthCommands::VerifyOtp { email, otp } => {
            auth.verify_otp(&email, &otp).await?;
            output::success("✓ Code accepted");
        }
        AuthCommands::ResetPassword { email, otp } => {
            let (password, confirmation) = prompt_new_password()?;
            auth.reset_password(&email, &otp, &password, &confirmation).await?;
            output::success("✓ Password reset. Log in with the new password.");
        }
        AuthCommands::ChangePassword => {
            let current = Password::new().with_prompt("Current password").interact()?;
            let (password, confirmation) = prompt_new_password()?;
            auth.change_password(&current, &password, &confirmation).await?;
            output::success("✓ Password changed");
        }
        AuthCommands::Profile { name, email, json } => {
            let profile = if name.is_some() || email.is_some() {
                let mut changes = json!({});
                if let Some(name) = name {
                    changes["name"] = json!(name);
                }
                if let Some(email) = email {
                    changes["email"] = json!(email);
                }
                auth.update_profile(changes).await?;
                auth.profile().await?
            } else {
                with_spinner("Loading profile...", auth.profile()).await?
            };
            if json {
                return print_json(&profile);
            }
            output::print_record(&profile);
        }
        AuthCommands::Status { json } => {
            let session = auth.session()?;
            if json {
                return print_json(&json!({
                    "loggedIn": session.is_some(),
                    "admin": session.as_ref().and_then(|s| s.admin_label()),
                    "expiresAt": session.as_ref().and_then(|s| s.expires_at()),
                    "apiUrl": ctx.config.base_url,
                }));
            }
            match session {
                None => println!("{}", "Not logged in".yellow()),
                Some(session) => {
                    let who = session.admin_label().unwrap_or_else(|| "admin".to_string());
                    println!("Logged in as {}", who.bold());
                    if let Some(exp) = session.expires_at() {
                        if session.is_expired(Utc::now()) {
                            println!("{}", format!("Token expired at {}", exp).red());
                        } else {
                            println!("Token valid until {}", exp);
                        }
                    }
                }
            }
            println!("{}", format!("API: {}", ctx.config.base_url).dimmed());
        }
    }

    Ok(())
}
