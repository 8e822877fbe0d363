//! User service - platform users and their account status

use serde_json::{json, Value as JsonValue};

use crate::api::ApiClient;
use crate::domain::result::Result;
use crate::domain::{ListQuery, Page, UserStatus};

pub const USERS_PATH: &str = "/users";

/// User management
#[derive(Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List users (`search`, `status` filters)
    pub async fn list(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client.get_page(USERS_PATH, query).await
    }

    pub async fn get(&self, id: &str) -> Result<JsonValue> {
        self.client.get_object(&format!("{}/{}", USERS_PATH, id)).await
    }

    pub async fn delete(&self, id: &str) -> Result<JsonValue> {
        self.client.delete(&format!("{}/{}", USERS_PATH, id)).await
    }

    /// Block or unblock a user.
    ///
    /// Sends the absolute target status, so repeating the same call is a no-op
    /// on the server.
    pub async fn set_status(&self, id: &str, status: UserStatus) -> Result<JsonValue> {
        self.client
            .put(
                &format!("{}/{}/status", USERS_PATH, id),
                json!({ "status": status.as_str() }),
            )
            .await
    }
}
