//! Sub-admin service - staff accounts and their page permissions

use serde_json::{json, Value as JsonValue};

use crate::api::ApiClient;
use crate::domain::result::Result;
use crate::domain::validation::{confirm_password, email, require};
use crate::domain::{ListQuery, Page};

const SUBADMINS_PATH: &str = "/admin/subadmins";

/// A new sub-admin account
#[derive(Debug, Clone, Default)]
pub struct SubAdminInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub permissions: Vec<String>,
}

impl SubAdminInput {
    pub fn to_body(&self) -> Result<JsonValue> {
        let name = require("Name", &self.name)?;
        let email = email(&self.email)?;
        confirm_password(&self.password, &self.confirm_password)?;
        Ok(json!({
            "name": name,
            "email": email.to_lowercase(),
            "password": self.password,
            "permissions": self.permissions,
        }))
    }
}

#[derive(Clone)]
pub struct SubAdminService {
    client: ApiClient,
}

impl SubAdminService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client.get_page(SUBADMINS_PATH, query).await
    }

    pub async fn create(&self, input: &SubAdminInput) -> Result<JsonValue> {
        self.client.post(SUBADMINS_PATH, input.to_body()?).await
    }

    /// Partial update (name, email, active flag)
    pub async fn update(&self, id: &str, changes: JsonValue) -> Result<JsonValue> {
        if let Some(address) = changes.get("email").and_then(|e| e.as_str()) {
            email(address)?;
        }
        self.client
            .put(&format!("{}/{}", SUBADMINS_PATH, id), changes)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<JsonValue> {
        self.client.delete(&format!("{}/{}", SUBADMINS_PATH, id)).await
    }

    pub async fn permissions(&self, id: &str) -> Result<JsonValue> {
        self.client
            .get_object(&format!("{}/{}/permissions", SUBADMINS_PATH, id))
            .await
    }

    /// Replace the permission set
    pub async fn set_permissions(&self, id: &str, permissions: &[String]) -> Result<JsonValue> {
        self.client
            .put(
                &format!("{}/{}/permissions", SUBADMINS_PATH, id),
                json!({ "permissions": permissions }),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SubAdminInput {
        SubAdminInput {
            name: "Support Desk".into(),
            email: "Desk@PropDesk.io".into(),
            password: "s3cretpass".into(),
            confirm_password: "s3cretpass".into(),
            permissions: vec!["users".into(), "kyc".into()],
        }
    }

    #[test]
    fn test_valid_body() {
        let body = valid().to_body().unwrap();
        assert_eq!(body["email"], "desk@propdesk.io");
        assert_eq!(body["permissions"], json!(["users", "kyc"]));
    }

    #[test]
    fn test_password_mismatch_rejected() {
        let input = SubAdminInput {
            confirm_password: "different1".into(),
            ..valid()
        };
        assert!(input.to_body().is_err());
    }

    #[test]
    fn test_bad_email_rejected() {
        let input = SubAdminInput {
            email: "not-an-email".into(),
            ..valid()
        };
        assert!(input.to_body().is_err());
    }
}
