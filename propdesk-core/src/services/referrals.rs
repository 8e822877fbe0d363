//! Referral service - referral rewards and payouts

use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};

use crate::api::ApiClient;
use crate::domain::fields::decimal_to_json;
use crate::domain::result::Result;
use crate::domain::validation::{positive_amount, require};
use crate::domain::{ListQuery, Page};

const REFERRALS_PATH: &str = "/referrals/admin";

#[derive(Clone)]
pub struct ReferralService {
    client: ApiClient,
}

impl ReferralService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Referrals (`status`, `search`)
    pub async fn list(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client.get_page(REFERRALS_PATH, query).await
    }

    /// Credit the referrer's reward
    pub async fn credit(&self, referral_id: &str, amount: Decimal) -> Result<JsonValue> {
        let referral_id = require("Referral ID", referral_id)?;
        let amount = positive_amount("Amount", amount)?;
        self.client
            .post(
                &format!("{}/credit", REFERRALS_PATH),
                json!({ "referralId": referral_id, "amount": decimal_to_json(amount) }),
            )
            .await
    }

    pub async fn cancel(&self, referral_id: &str, reason: &str) -> Result<JsonValue> {
        let referral_id = require("Referral ID", referral_id)?;
        let reason = require("Reason", reason)?;
        self.client
            .post(
                &format!("{}/cancel", REFERRALS_PATH),
                json!({ "referralId": referral_id, "reason": reason }),
            )
            .await
    }

    pub async fn stats(&self) -> Result<JsonValue> {
        self.client
            .get_object(&format!("{}/stats", REFERRALS_PATH))
            .await
    }
}
