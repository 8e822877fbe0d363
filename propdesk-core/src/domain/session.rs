//! Admin session held between commands
//!
//! The session file is the terminal equivalent of the browser's local
//! storage entry; field names keep the storage keys the backend issues.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "adminAccessToken";

/// Logged-in admin session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "adminAccessToken")]
    pub access_token: String,
    #[serde(rename = "adminRefreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Profile returned at login, cached for `pd auth status`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<JsonValue>,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            profile: None,
        }
    }

    pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = Some(token.into());
        self
    }

    pub fn with_profile(mut self, profile: JsonValue) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Expiry decoded from the JWT `exp` claim.
    ///
    /// Opaque tokens (or JWTs without `exp`) have no known expiry.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let payload = self.access_token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        let claims: JsonValue = serde_json::from_slice(&bytes).ok()?;
        let exp = claims.get("exp")?.as_i64()?;
        Utc.timestamp_opt(exp, 0).single()
    }

    /// Whether the token is known to be expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|exp| exp <= now).unwrap_or(false)
    }

    /// Email or name of the logged-in admin, when the profile carries one
    pub fn admin_label(&self) -> Option<String> {
        let profile = self.profile.as_ref()?;
        ["email", "name", "username"]
            .iter()
            .find_map(|key| profile.get(*key).and_then(|v| v.as_str()).map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jwt_with(claims: JsonValue) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.signature", header, payload)
    }

    #[test]
    fn test_expiry_from_jwt() {
        let session = Session::new(jwt_with(json!({"sub": "admin", "exp": 1_700_000_000})));
        let exp = session.expires_at().unwrap();
        assert_eq!(exp.timestamp(), 1_700_000_000);

        let before = Utc.timestamp_opt(1_699_999_999, 0).unwrap();
        let after = Utc.timestamp_opt(1_700_000_001, 0).unwrap();
        assert!(!session.is_expired(before));
        assert!(session.is_expired(after));
    }

    #[test]
    fn test_opaque_token_never_expires() {
        let session = Session::new("opaque-token");
        assert!(session.expires_at().is_none());
        assert!(!session.is_expired(Utc::now()));
    }

    #[test]
    fn test_serialized_keys() {
        let session = Session::new("abc").with_refresh_token("def");
        let v = serde_json::to_value(&session).unwrap();
        assert_eq!(v[ACCESS_TOKEN_KEY], "abc");
        assert_eq!(v["adminRefreshToken"], "def");
        assert!(v.get("profile").is_none());
    }

    #[test]
    fn test_admin_label() {
        let session = Session::new("t").with_profile(json!({"name": "Root", "email": "root@desk.io"}));
        assert_eq!(session.admin_label(), Some("root@desk.io".to_string()));
    }
}
