//! KYC service - identity and bank verification review

use serde_json::{json, Value as JsonValue};

use crate::api::ApiClient;
use crate::domain::filter::filter_eq;
use crate::domain::result::{Error, Result};
use crate::domain::validation::require;
use crate::domain::{KycDecision, ListQuery, Page};

pub const KYC_LIST_PATH: &str = "/kyc/admin/list";
pub const KYC_VERIFY_PATH: &str = "/kyc/admin/verify";

/// KYC review
#[derive(Clone)]
pub struct KycService {
    client: ApiClient,
}

impl KycService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List KYC submissions.
    ///
    /// The `status` filter is sent to the server and applied again locally,
    /// since some backend versions ignore it.
    pub async fn list(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        let mut page = self.client.get_page(KYC_LIST_PATH, query).await?;
        if let Some(status) = query.filters.get("status") {
            page.items = filter_eq(&page.items, "status", status);
        }
        Ok(page)
    }

    pub async fn get(&self, id: &str) -> Result<JsonValue> {
        self.client.get_object(&format!("/kyc/admin/{}", id)).await
    }

    /// Approve or reject a submission. Rejections need a reason.
    pub async fn verify(
        &self,
        id: &str,
        decision: KycDecision,
        reason: Option<&str>,
    ) -> Result<JsonValue> {
        let mut body = json!({
            "kycId": id,
            "status": decision.as_str(),
        });
        if decision == KycDecision::Rejected {
            let reason = require("Rejection reason", reason.unwrap_or_default())?;
            body["rejectionReason"] = json!(reason);
        } else if let Some(note) = reason.filter(|r| !r.trim().is_empty()) {
            body["notes"] = json!(note.trim());
        }
        self.client.post(KYC_VERIFY_PATH, body).await
    }

    /// Mark the bank details attached to a submission as verified or not
    pub async fn verify_bank(&self, id: &str, verified: bool, reason: Option<&str>) -> Result<JsonValue> {
        if !verified && reason.map(|r| r.trim().is_empty()).unwrap_or(true) {
            return Err(Error::validation("A reason is required when rejecting bank details"));
        }
        let mut body = json!({ "verified": verified });
        if let Some(reason) = reason {
            body["reason"] = json!(reason.trim());
        }
        self.client
            .put(&format!("/kyc/admin/{}/verify-bank", id), body)
            .await
    }
}
