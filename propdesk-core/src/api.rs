//! API client shared by all services
//!
//! Thin layer over a [`Transport`] that knows about the backend's envelope
//! conventions and the per-endpoint "404 means empty" policy.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::domain::envelope::{extract_list, extract_object, Page, DEFAULT_LIST_PATHS};
use crate::domain::result::Result;
use crate::domain::ListQuery;
use crate::ports::{ApiRequest, FormPart, Method, Transport};

/// Client for the admin REST API
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    not_found_as_empty: Arc<Vec<String>>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, not_found_as_empty: Vec<String>) -> Self {
        Self {
            transport,
            not_found_as_empty: Arc::new(
                not_found_as_empty
                    .into_iter()
                    .map(|p| p.trim_end_matches('/').to_string())
                    .collect(),
            ),
        }
    }

    /// Whether a 404 from `path` reads as an empty collection
    pub fn not_found_is_empty(&self, path: &str) -> bool {
        let path = path.trim_end_matches('/');
        self.not_found_as_empty.iter().any(|p| p == path)
    }

    async fn send_json(&self, request: ApiRequest) -> Result<JsonValue> {
        self.transport.send(request).await?.json()
    }

    /// GET returning the raw JSON body
    pub async fn get(&self, path: &str, query: Vec<(String, String)>) -> Result<JsonValue> {
        self.send_json(ApiRequest::get(path).with_query(query)).await
    }

    /// GET with 404-as-empty applied. `Ok(None)` means "treated as empty".
    async fn get_collection(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Option<JsonValue>> {
        match self.get(path, query).await {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.is_not_found() && self.not_found_is_empty(path) => {
                debug!(path, "404 treated as empty collection");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// GET a paginated list, extracting items through the envelope chain
    pub async fn get_page(&self, path: &str, query: &ListQuery) -> Result<Page<JsonValue>> {
        match self.get_collection(path, query.to_pairs()).await? {
            Some(body) => Ok(Page::from_response(&body, query.page, query.limit)),
            None => Ok(Page::empty(query.limit)),
        }
    }

    /// GET a list with custom envelope candidates
    pub async fn get_list_at(
        &self,
        path: &str,
        query: Vec<(String, String)>,
        paths: &[&str],
    ) -> Result<Vec<JsonValue>> {
        Ok(self
            .get_collection(path, query)
            .await?
            .map(|body| extract_list(&body, paths))
            .unwrap_or_default())
    }

    /// GET a list with the default envelope candidates
    pub async fn get_list(&self, path: &str, query: Vec<(String, String)>) -> Result<Vec<JsonValue>> {
        self.get_list_at(path, query, DEFAULT_LIST_PATHS).await
    }

    /// GET a single record, unwrapping `result` / `data`
    pub async fn get_object(&self, path: &str) -> Result<JsonValue> {
        let body = self.get(path, Vec::new()).await?;
        Ok(extract_object(&body))
    }

    /// GET that never fails: errors are logged and read as `{}`.
    ///
    /// Used for fan-out fetches where one failing endpoint must not blank
    /// the whole view.
    pub async fn get_or_empty(&self, path: &str, query: Vec<(String, String)>) -> JsonValue {
        match self.get(path, query).await {
            Ok(body) => body,
            Err(e) => {
                warn!(path, error = %e, "sub-fetch failed, treating as empty");
                JsonValue::Object(Default::default())
            }
        }
    }

    pub async fn post(&self, path: &str, body: JsonValue) -> Result<JsonValue> {
        self.send_json(ApiRequest::new(Method::Post, path).with_json(body)).await
    }

    pub async fn put(&self, path: &str, body: JsonValue) -> Result<JsonValue> {
        self.send_json(ApiRequest::new(Method::Put, path).with_json(body)).await
    }

    pub async fn patch(&self, path: &str, body: JsonValue) -> Result<JsonValue> {
        self.send_json(ApiRequest::new(Method::Patch, path).with_json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<JsonValue> {
        self.send_json(ApiRequest::new(Method::Delete, path)).await
    }

    pub async fn post_multipart(&self, path: &str, parts: Vec<FormPart>) -> Result<JsonValue> {
        self.send_json(ApiRequest::new(Method::Post, path).with_multipart(parts))
            .await
    }

    pub async fn put_multipart(&self, path: &str, parts: Vec<FormPart>) -> Result<JsonValue> {
        self.send_json(ApiRequest::new(Method::Put, path).with_multipart(parts))
            .await
    }

    /// GET a binary body (CSV exports)
    pub async fn download(&self, path: &str, query: Vec<(String, String)>) -> Result<Vec<u8>> {
        let response = self
            .transport
            .send(ApiRequest::get(path).with_query(query))
            .await?;
        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::result::Error;
    use crate::ports::{ApiResponse, RequestBody};
    use async_trait::async_trait;
    use serde_json::json;

    struct NotFoundTransport;

    #[async_trait]
    impl Transport for NotFoundTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
            Err(Error::not_found(request.path))
        }
    }

    struct FixedTransport(JsonValue);

    #[async_trait]
    impl Transport for FixedTransport {
        async fn send(&self, _request: ApiRequest) -> Result<ApiResponse> {
            Ok(ApiResponse::json_ok(&self.0))
        }
    }

    #[derive(Default)]
    struct RecordingTransport(std::sync::Mutex<Vec<ApiRequest>>);

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
            self.0.lock().unwrap().push(request);
            Ok(ApiResponse::json_ok(&json!({"success": true})))
        }
    }

    #[tokio::test]
    async fn test_write_helpers_use_their_method() {
        let transport = Arc::new(RecordingTransport::default());
        let client = ApiClient::new(transport.clone(), Vec::new());
        client.patch("/users/u1", json!({"name": "Ada"})).await.unwrap();
        client.delete("/users/u1").await.unwrap();

        let sent = transport.0.lock().unwrap();
        assert_eq!(sent[0].method, Method::Patch);
        assert_eq!(sent[0].body, RequestBody::Json(json!({"name": "Ada"})));
        assert_eq!(sent[1].method, Method::Delete);
        assert_eq!(sent[1].body, RequestBody::Empty);
    }

    #[tokio::test]
    async fn test_not_found_policy_is_per_endpoint() {
        let client = ApiClient::new(Arc::new(NotFoundTransport), vec!["/news/admin/".to_string()]);

        let page = client.get_page("/news/admin", &ListQuery::default()).await.unwrap();
        assert!(page.items.is_empty());

        let err = client.get_page("/users", &ListQuery::default()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_or_empty_swallows_errors() {
        let client = ApiClient::new(Arc::new(NotFoundTransport), Vec::new());
        assert_eq!(client.get_or_empty("/users", Vec::new()).await, json!({}));
    }

    #[tokio::test]
    async fn test_get_page_extracts_envelope() {
        let body = json!({"success": true, "result": {"data": [{"_id": "a"}], "pagination": {"page": 1, "limit": 10, "total": 1}}});
        let client = ApiClient::new(Arc::new(FixedTransport(body)), Vec::new());
        let page = client.get_page("/users", &ListQuery::default()).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[tokio::test]
    async fn test_get_object_unwraps_result() {
        let client = ApiClient::new(Arc::new(FixedTransport(json!({"result": {"_id": "u1"}}))), Vec::new());
        assert_eq!(client.get_object("/users/u1").await.unwrap(), json!({"_id": "u1"}));
    }
}
