//! Purchase service - challenge plans, add-ons, purchases and college discounts

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use crate::api::ApiClient;
use crate::domain::aggregate::{count_where, group_counts, ratio, sum_first_of, unique_count};
use crate::domain::envelope::extract_default_list;
use crate::domain::fields::decimal_to_json;
use crate::domain::result::Result;
use crate::domain::validation::{positive_amount, require};
use crate::domain::{ListQuery, Page};

use super::AGGREGATE_LIMIT;

pub const PLANS_PATH: &str = "/purchase/admin/plans";
pub const ADDONS_PATH: &str = "/purchase/admin/addons";
pub const PURCHASES_PATH: &str = "/purchase/admin/purchases";
pub const DISCOUNTS_PATH: &str = "/purchase/admin/college-discounts";

/// Amount fields on purchase records, newest naming first
const PURCHASE_AMOUNT_FIELDS: &[&str] = &["totalAmount", "amount", "price"];

/// Fields for a new or edited challenge plan
#[derive(Debug, Clone, Default)]
pub struct PlanInput {
    pub name: String,
    pub price: Decimal,
    pub account_size: Option<Decimal>,
    pub profit_target_percent: Option<Decimal>,
    pub max_daily_loss_percent: Option<Decimal>,
    pub max_total_loss_percent: Option<Decimal>,
    pub description: Option<String>,
    pub active: bool,
}

impl PlanInput {
    /// Validate and render the request body
    pub fn to_body(&self) -> Result<JsonValue> {
        let name = require("Plan name", &self.name)?;
        let price = positive_amount("Price", self.price)?;

        let mut body = json!({
            "name": name,
            "price": decimal_to_json(price),
            "isActive": self.active,
        });
        let optional = [
            ("accountSize", self.account_size),
            ("profitTarget", self.profit_target_percent),
            ("maxDailyLoss", self.max_daily_loss_percent),
            ("maxTotalLoss", self.max_total_loss_percent),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                body[key] = decimal_to_json(value);
            }
        }
        if let Some(description) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            body["description"] = json!(description.trim());
        }
        Ok(body)
    }
}

/// Fields for a college discount code
#[derive(Debug, Clone, Default)]
pub struct DiscountInput {
    pub college_name: String,
    pub code: String,
    pub discount_percent: Decimal,
    pub active: bool,
}

impl DiscountInput {
    pub fn to_body(&self) -> Result<JsonValue> {
        let college = require("College name", &self.college_name)?;
        let code = require("Discount code", &self.code)?;
        let percent = positive_amount("Discount", self.discount_percent)?;
        if percent > Decimal::ONE_HUNDRED {
            return Err(crate::domain::result::Error::validation(
                "Discount cannot exceed 100%",
            ));
        }
        Ok(json!({
            "collegeName": college,
            "code": code.to_uppercase(),
            "discountPercentage": decimal_to_json(percent),
            "isActive": self.active,
        }))
    }
}

/// Statistics derived from the purchase list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseStats {
    pub total_purchases_count: usize,
    pub unique_user_ids: usize,
    /// Two-decimal string, as displayed
    pub avg_accounts_per_user: String,
    pub purchase_total_revenue: Decimal,
    pub completed_count: usize,
    pub by_plan: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
}

impl PurchaseStats {
    /// Derive statistics from an already extracted purchase list
    pub fn from_purchases(purchases: &[JsonValue]) -> Self {
        let total = purchases.len();
        let unique_users = unique_count(purchases, "user._id");
        Self {
            total_purchases_count: total,
            unique_user_ids: unique_users,
            avg_accounts_per_user: ratio(total, unique_users),
            purchase_total_revenue: sum_first_of(purchases, PURCHASE_AMOUNT_FIELDS),
            completed_count: count_where(purchases, "status", "completed"),
            by_plan: group_counts(purchases, "plan.name"),
            by_status: group_counts(purchases, "status"),
        }
    }
}

/// Plans, add-ons, purchases and discounts
#[derive(Clone)]
pub struct PurchaseService {
    client: ApiClient,
}

impl PurchaseService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // === Plans ===

    pub async fn plans(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client.get_page(PLANS_PATH, query).await
    }

    pub async fn create_plan(&self, input: &PlanInput) -> Result<JsonValue> {
        self.client.post(PLANS_PATH, input.to_body()?).await
    }

    pub async fn update_plan(&self, id: &str, input: &PlanInput) -> Result<JsonValue> {
        self.client
            .put(&format!("{}/{}", PLANS_PATH, id), input.to_body()?)
            .await
    }

    pub async fn delete_plan(&self, id: &str) -> Result<JsonValue> {
        self.client.delete(&format!("{}/{}", PLANS_PATH, id)).await
    }

    // === Add-ons ===

    pub async fn addons(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client.get_page(ADDONS_PATH, query).await
    }

    pub async fn create_addon(&self, name: &str, price: Decimal, description: Option<&str>) -> Result<JsonValue> {
        let name = require("Add-on name", name)?;
        let price = positive_amount("Price", price)?;
        let mut body = json!({ "name": name, "price": decimal_to_json(price) });
        if let Some(d) = description {
            body["description"] = json!(d);
        }
        self.client.post(ADDONS_PATH, body).await
    }

    pub async fn update_addon(&self, id: &str, changes: JsonValue) -> Result<JsonValue> {
        self.client
            .put(&format!("{}/{}", ADDONS_PATH, id), changes)
            .await
    }

    pub async fn delete_addon(&self, id: &str) -> Result<JsonValue> {
        self.client.delete(&format!("{}/{}", ADDONS_PATH, id)).await
    }

    // === Purchases ===

    /// Purchases (`status`, `plan`, `search` filters)
    pub async fn purchases(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client.get_page(PURCHASES_PATH, query).await
    }

    /// Fetch purchases and derive the purchase-plan statistics
    pub async fn purchase_stats(&self) -> Result<PurchaseStats> {
        let query = ListQuery::new(AGGREGATE_LIMIT).to_pairs();
        let body = self.client.get(PURCHASES_PATH, query).await?;
        Ok(PurchaseStats::from_purchases(&extract_default_list(&body)))
    }

    // === College discounts ===

    pub async fn discounts(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client.get_page(DISCOUNTS_PATH, query).await
    }

    pub async fn create_discount(&self, input: &DiscountInput) -> Result<JsonValue> {
        self.client.post(DISCOUNTS_PATH, input.to_body()?).await
    }

    pub async fn update_discount(&self, id: &str, input: &DiscountInput) -> Result<JsonValue> {
        self.client
            .put(&format!("{}/{}", DISCOUNTS_PATH, id), input.to_body()?)
            .await
    }

    pub async fn delete_discount(&self, id: &str) -> Result<JsonValue> {
        self.client.delete(&format!("{}/{}", DISCOUNTS_PATH, id)).await
    }

    pub async fn discount_stats(&self) -> Result<JsonValue> {
        self.client
            .get_object(&format!("{}/stats", DISCOUNTS_PATH))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_stats_scenario() {
        let purchases = vec![
            json!({"user": {"_id": "u1"}, "totalAmount": 500}),
            json!({"user": {"_id": "u1"}, "totalAmount": 300}),
            json!({"user": {"_id": "u2"}, "totalAmount": 200}),
        ];
        let stats = PurchaseStats::from_purchases(&purchases);
        assert_eq!(stats.total_purchases_count, 3);
        assert_eq!(stats.unique_user_ids, 2);
        assert_eq!(stats.avg_accounts_per_user, "1.50");
        assert_eq!(stats.purchase_total_revenue, Decimal::new(1000, 0));
    }

    #[test]
    fn test_purchase_stats_empty() {
        let stats = PurchaseStats::from_purchases(&[]);
        assert_eq!(stats.total_purchases_count, 0);
        assert_eq!(stats.avg_accounts_per_user, "0.00");
        assert_eq!(stats.purchase_total_revenue, Decimal::ZERO);
    }

    #[test]
    fn test_plan_body_validation() {
        let mut input = PlanInput {
            name: "Evaluation 50K".into(),
            price: Decimal::new(29900, 2),
            account_size: Some(Decimal::new(50000, 0)),
            active: true,
            ..Default::default()
        };
        let body = input.to_body().unwrap();
        assert_eq!(body["name"], "Evaluation 50K");
        assert_eq!(body["price"], json!(299));
        assert_eq!(body["accountSize"], json!(50000));
        assert!(body.get("maxDailyLoss").is_none());

        input.price = Decimal::ZERO;
        assert!(input.to_body().is_err());
        input.price = Decimal::ONE;
        input.name = " ".into();
        assert!(input.to_body().is_err());
    }

    #[test]
    fn test_discount_body() {
        let input = DiscountInput {
            college_name: "State U".into(),
            code: "stateu10".into(),
            discount_percent: Decimal::new(10, 0),
            active: true,
        };
        assert_eq!(input.to_body().unwrap()["code"], "STATEU10");

        let too_much = DiscountInput {
            discount_percent: Decimal::new(150, 0),
            ..input
        };
        assert!(too_much.to_body().is_err());
    }
}
