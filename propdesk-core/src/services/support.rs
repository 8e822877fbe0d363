//! Support service - ticket queue, replies and assignment

use serde_json::{json, Value as JsonValue};

use crate::api::ApiClient;
use crate::domain::result::Result;
use crate::domain::validation::require;
use crate::domain::{ListQuery, Page, TicketStatus};

const SUPPORT_PATH: &str = "/support/admin";

#[derive(Clone)]
pub struct SupportService {
    client: ApiClient,
}

impl SupportService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Tickets (`status`, `priority`, `category`, `search`)
    pub async fn list(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client
            .get_page(&format!("{}/list", SUPPORT_PATH), query)
            .await
    }

    /// Ticket with its message thread
    pub async fn get(&self, id: &str) -> Result<JsonValue> {
        self.client
            .get_object(&format!("{}/{}", SUPPORT_PATH, id))
            .await
    }

    /// Reply to a ticket, optionally moving it to a new status
    pub async fn reply(&self, id: &str, message: &str, status: Option<TicketStatus>) -> Result<JsonValue> {
        let message = require("Message", message)?;
        let mut body = json!({ "message": message });
        if let Some(status) = status {
            body["status"] = json!(status.as_str());
        }
        self.client
            .post(&format!("{}/{}/reply", SUPPORT_PATH, id), body)
            .await
    }

    /// Change status through the reply route with a short operator note
    pub async fn set_status(&self, id: &str, status: TicketStatus) -> Result<JsonValue> {
        let note = format!("Ticket marked as {}", status.as_str());
        self.reply(id, &note, Some(status)).await
    }

    pub async fn assign(&self, id: &str, admin_id: &str) -> Result<JsonValue> {
        let admin_id = require("Admin ID", admin_id)?;
        self.client
            .put(
                &format!("{}/{}/assign", SUPPORT_PATH, id),
                json!({ "assignedTo": admin_id }),
            )
            .await
    }
}
