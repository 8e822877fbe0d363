//! Admin API HTTP client
//!
//! Wraps reqwest with the console's request conventions: a configurable base
//! URL, bearer authentication read from the injected session store on every
//! request, and status codes mapped onto the domain error taxonomy. There is
//! deliberately no retry and no refresh-on-401.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, StatusCode};
use serde_json::Value as JsonValue;
use tracing::debug;
use url::Url;

use crate::domain::result::{Error, Result};
use crate::ports::{ApiRequest, ApiResponse, FormPart, Method, RequestBody, TokenStore, Transport};

/// Legacy header some backend routes still read the token from
pub const LEGACY_TOKEN_HEADER: &str = "token";

/// reqwest-backed [`Transport`]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    timeout: Duration,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(Error::Config("API base URL cannot be empty".to_string()));
        }
        Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid API base URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("propdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            tokens,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a request path plus query
    fn url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| Error::Config(format!("Invalid request path '{}': {}", path, e)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    fn build_form(parts: Vec<FormPart>) -> Result<Form> {
        let mut form = Form::new();
        for part in parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File {
                    name,
                    file_name,
                    bytes,
                    mime,
                } => {
                    let mut file = Part::bytes(bytes).file_name(file_name);
                    if let Some(mime) = mime {
                        file = file
                            .mime_str(&mime)
                            .map_err(|e| Error::validation(format!("Invalid MIME type '{}': {}", mime, e)))?;
                    }
                    form.part(name, file)
                }
            };
        }
        Ok(form)
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::network(format!(
                "Request timed out after {} seconds",
                self.timeout.as_secs()
            ))
        } else if error.is_connect() {
            Error::network(format!("Unable to connect to {}", self.base_url))
        } else {
            Error::network(format!("Request failed: {}", error))
        }
    }
}

/// Human-readable message from an error body: `message`, then `error`,
/// then the canonical status reason.
pub fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<JsonValue>(body)
        .ok()
        .and_then(|v| {
            ["message", "error", "result.message"].iter().find_map(|key| {
                crate::domain::fields::get_path(&v, key)
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_string()
        })
}

/// Map a non-2xx status onto the error taxonomy
pub fn status_error(status: StatusCode, path: &str, body: &[u8]) -> Error {
    let message = error_message(status, body);
    match status {
        StatusCode::UNAUTHORIZED => Error::Unauthorized(message),
        StatusCode::NOT_FOUND => Error::NotFound(format!("{} ({})", path, message)),
        _ => Error::Http {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path, &request.query)?;

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, url);

        // Read fresh on every request
        if let Some(token) = self.tokens.token() {
            builder = builder
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(LEGACY_TOKEN_HEADER, token);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(parts) => builder.multipart(Self::build_form(parts)?),
        };

        debug!(method = %request.method, path = %request.path, "sending request");

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_request_error(e))?
            .to_vec();

        debug!(method = %request.method, path = %request.path, status = status.as_u16(), "response received");

        if !status.is_success() {
            return Err(status_error(status, &request.path, &body));
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
