//! Stage service - challenge stage configuration and trader progression

use std::collections::BTreeMap;

use serde_json::{json, Value as JsonValue};

use crate::api::ApiClient;
use crate::domain::aggregate::group_counts;
use crate::domain::result::Result;
use crate::domain::validation::require;
use crate::domain::{ListQuery, Page};

pub const STAGE_CONFIG_PATH: &str = "/stages/admin/config";
pub const STAGE_USERS_PATH: &str = "/stages/admin/users";

/// Stage management
#[derive(Clone)]
pub struct StageService {
    client: ApiClient,
}

impl StageService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn config(&self) -> Result<JsonValue> {
        self.client.get_object(STAGE_CONFIG_PATH).await
    }

    /// Replace stage rules (targets, loss limits, minimum trading days)
    pub async fn update_config(&self, config: JsonValue) -> Result<JsonValue> {
        self.client.put(STAGE_CONFIG_PATH, config).await
    }

    /// Trader accounts with their current stage (`stage`, `status`, `search`)
    pub async fn users(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client.get_page(STAGE_USERS_PATH, query).await
    }

    /// Move an account to its next stage (or `target_stage` when given)
    pub async fn advance(&self, account_id: &str, target_stage: Option<&str>, notes: Option<&str>) -> Result<JsonValue> {
        let account_id = require("Account ID", account_id)?;
        let mut body = json!({ "accountId": account_id });
        if let Some(stage) = target_stage {
            body["targetStage"] = json!(stage);
        }
        if let Some(notes) = notes {
            body["notes"] = json!(notes);
        }
        self.client.post("/stages/admin/advance", body).await
    }

    pub async fn reset_daily_loss(&self, account_id: &str) -> Result<JsonValue> {
        let account_id = require("Account ID", account_id)?;
        self.client
            .post("/stages/admin/reset-daily-loss", json!({ "accountId": account_id }))
            .await
    }

    /// Trade history of one account
    pub async fn trades(&self, account_id: &str, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client
            .get_page(&format!("/stages/admin/trades/{}", account_id), query)
            .await
    }
}

/// Accounts per stage on a page of stage users
pub fn stage_breakdown(users: &[JsonValue]) -> BTreeMap<String, usize> {
    group_counts(users, "currentStage")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_breakdown() {
        let users = vec![
            json!({"currentStage": "Stage 1"}),
            json!({"currentStage": "Stage 1"}),
            json!({"currentStage": "Funded"}),
        ];
        let breakdown = stage_breakdown(&users);
        assert_eq!(breakdown["Stage 1"], 2);
        assert_eq!(breakdown["Funded"], 1);
    }
}
