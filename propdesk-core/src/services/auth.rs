//! Auth service - admin login, password flows and profile
//!
//! Login stores the session through the injected [`TokenStore`]; every later
//! request picks the token up from there. There is no automatic refresh:
//! `refresh_token` is an explicit operation.

use std::sync::Arc;

use serde_json::{json, Value as JsonValue};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::domain::fields::{as_text, get_path};
use crate::domain::result::{Error, Result};
use crate::domain::validation::{confirm_password, email, require};
use crate::domain::Session;
use crate::ports::TokenStore;

const AUTH_PATH: &str = "/admin";

/// Where login/refresh responses carry the access token
const ACCESS_TOKEN_PATHS: &[&str] = &["result.accessToken", "result.token", "accessToken", "token"];
const REFRESH_TOKEN_PATHS: &[&str] = &["result.refreshToken", "refreshToken"];
const PROFILE_PATHS: &[&str] = &["result.admin", "result.user", "admin", "user"];

fn first_text(body: &JsonValue, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .find_map(|p| as_text(body, p))
        .filter(|t| !t.is_empty())
}

/// Build a session from a login or refresh response
pub fn session_from_response(body: &JsonValue) -> Result<Session> {
    let token = first_text(body, ACCESS_TOKEN_PATHS)
        .ok_or_else(|| Error::session("Login response did not contain an access token"))?;

    let mut session = Session::new(token);
    if let Some(refresh) = first_text(body, REFRESH_TOKEN_PATHS) {
        session = session.with_refresh_token(refresh);
    }
    if let Some(profile) = PROFILE_PATHS
        .iter()
        .find_map(|p| get_path(body, p))
        .filter(|p| p.is_object())
    {
        session = session.with_profile(profile.clone());
    }
    Ok(session)
}

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    tokens: Arc<dyn TokenStore>,
}

impl AuthService {
    pub fn new(client: ApiClient, tokens: Arc<dyn TokenStore>) -> Self {
        Self { client, tokens }
    }

    /// Current session, if any
    pub fn session(&self) -> Result<Option<Session>> {
        self.tokens.session()
    }

    /// Log in and persist the session
    pub async fn login(&self, address: &str, password: &str) -> Result<Session> {
        let address = email(address)?;
        let password = require("Password", password)?;

        let body = self
            .client
            .post(
                &format!("{}/login", AUTH_PATH),
                json!({ "email": address, "password": password }),
            )
            .await?;

        let session = session_from_response(&body)?;
        self.tokens.save(&session)?;
        info!(admin = %address, "logged in");
        Ok(session)
    }

    /// Log out. The local session is cleared even when the server call fails.
    pub async fn logout(&self) -> Result<()> {
        let server = self
            .client
            .post(&format!("{}/logout", AUTH_PATH), json!({}))
            .await;
        self.tokens.clear()?;
        if let Err(e) = server {
            warn!(error = %e, "server logout failed; local session cleared anyway");
        }
        Ok(())
    }

    /// Exchange the stored refresh token for a new access token
    pub async fn refresh_token(&self) -> Result<Session> {
        let current = self
            .tokens
            .session()?
            .ok_or_else(|| Error::session("Not logged in"))?;
        let refresh = current
            .refresh_token
            .clone()
            .ok_or_else(|| Error::session("Session has no refresh token; log in again"))?;

        let body = self
            .client
            .post(
                &format!("{}/refresh-token", AUTH_PATH),
                json!({ "refreshToken": refresh }),
            )
            .await?;

        let mut session = session_from_response(&body)?;
        if session.refresh_token.is_none() {
            session.refresh_token = Some(refresh);
        }
        if session.profile.is_none() {
            session.profile = current.profile;
        }
        self.tokens.save(&session)?;
        Ok(session)
    }

    /// Request a one-time password by email
    pub async fn forgot_password(&self, address: &str) -> Result<JsonValue> {
        let address = email(address)?;
        self.client
            .post(
                &format!("{}/forgot-password", AUTH_PATH),
                json!({ "email": address }),
            )
            .await
    }

    pub async fn verify_otp(&self, address: &str, otp: &str) -> Result<JsonValue> {
        let address = email(address)?;
        let otp = require("OTP", otp)?;
        self.client
            .post(
                &format!("{}/verify-otp", AUTH_PATH),
                json!({ "email": address, "otp": otp }),
            )
            .await
    }

    pub async fn reset_password(
        &self,
        address: &str,
        otp: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<JsonValue> {
        let address = email(address)?;
        let otp = require("OTP", otp)?;
        confirm_password(password, confirmation)?;
        self.client
            .post(
                &format!("{}/reset-password", AUTH_PATH),
                json!({ "email": address, "otp": otp, "newPassword": password }),
            )
            .await
    }

    pub async fn change_password(
        &self,
        current: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<JsonValue> {
        let current = require("Current password", current)?;
        confirm_password(password, confirmation)?;
        if current == password {
            return Err(Error::validation(
                "New password must differ from the current one",
            ));
        }
        self.client
            .put(
                &format!("{}/change-password", AUTH_PATH),
                json!({ "currentPassword": current, "newPassword": password }),
            )
            .await
    }

    pub async fn profile(&self) -> Result<JsonValue> {
        self.client
            .get_object(&format!("{}/profile", AUTH_PATH))
            .await
    }

    /// Update the profile and refresh the cached copy in the session
    pub async fn update_profile(&self, changes: JsonValue) -> Result<JsonValue> {
        if let Some(address) = changes.get("email").and_then(|e| e.as_str()) {
            email(address)?;
        }
        let response = self
            .client
            .put(&format!("{}/profile", AUTH_PATH), changes)
            .await?;

        if let Some(session) = self.tokens.session()? {
            let profile = crate::domain::envelope::extract_object(&response);
            if profile.is_object() {
                self.tokens.save(&session.with_profile(profile))?;
            }
        }
        Ok(response)
    }
}
