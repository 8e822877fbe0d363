//! Security service - sessions, rule violations and travel verification

use serde_json::{json, Value as JsonValue};

use crate::api::ApiClient;
use crate::domain::result::Result;
use crate::domain::validation::require;
use crate::domain::{ListQuery, Page};

const SECURITY_PATH: &str = "/security/admin";

#[derive(Clone)]
pub struct SecurityService {
    client: ApiClient,
}

impl SecurityService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> Result<JsonValue> {
        self.client
            .get_object(&format!("{}/stats", SECURITY_PATH))
            .await
    }

    /// Active trader sessions (`userId`, `search`)
    pub async fn sessions(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client
            .get_page(&format!("{}/sessions", SECURITY_PATH), query)
            .await
    }

    /// Detected violations (`type`, `resolved`, `severity`)
    pub async fn violations(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client
            .get_page(&format!("{}/violations", SECURITY_PATH), query)
            .await
    }

    /// Confirm a user's declared travel so logins from the new location
    /// are not flagged
    pub async fn verify_travel(&self, user_id: &str, location: &str, notes: Option<&str>) -> Result<JsonValue> {
        let user_id = require("User ID", user_id)?;
        let location = require("Location", location)?;
        let mut body = json!({ "userId": user_id, "location": location });
        if let Some(notes) = notes {
            body["notes"] = json!(notes);
        }
        self.client
            .post(&format!("{}/verify-travel", SECURITY_PATH), body)
            .await
    }

    pub async fn resolve_violation(&self, id: &str, resolution: &str) -> Result<JsonValue> {
        let resolution = require("Resolution", resolution)?;
        self.client
            .put(
                &format!("{}/violations/{}/resolve", SECURITY_PATH, id),
                json!({ "resolution": resolution }),
            )
            .await
    }
}
