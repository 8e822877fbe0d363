//! Integration tests for propdesk-core services
//!
//! The network is mocked at the `Transport` trait level with a scripted
//! backend; everything above it (ApiClient, services, list controller,
//! confirm-and-mutate) runs for real.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{json, Value as JsonValue};
use tempfile::TempDir;

use propdesk_core::adapters::token_store::MemoryTokenStore;
use propdesk_core::config::Config;
use propdesk_core::domain::result::Result;
use propdesk_core::domain::{KycDecision, UserStatus};
use propdesk_core::ports::{ApiRequest, ApiResponse, Method, RequestBody, TokenStore, Transport};
use propdesk_core::services::{confirm_and_mutate, AutoConfirm, MutationOutcome};
use propdesk_core::{AdminContext, Error, ListQuery};

// ============================================================================
// Scripted backend
// ============================================================================

type Handler = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync>;

/// Routes keyed by `"METHOD /path"`; unknown routes answer 404
#[derive(Default)]
struct FakeBackend {
    routes: HashMap<String, Handler>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeBackend {
    fn route<F>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync + 'static,
    {
        self.routes
            .insert(format!("{} {}", method, path), Box::new(handler));
        self
    }

    fn json(self, method: Method, path: &str, body: JsonValue) -> Self {
        self.route(method, path, move |_| Ok(ApiResponse::json_ok(&body)))
    }

    fn failing(self, method: Method, path: &str, status: u16) -> Self {
        self.route(method, path, move |_| {
            Err(Error::Http {
                status,
                message: "internal error".to_string(),
            })
        })
    }

    fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match self.routes.get(&format!("{} {}", request.method, request.path)) {
            Some(handler) => handler(&request),
            None => Err(Error::not_found(request.path.clone())),
        }
    }
}

fn context(backend: Arc<FakeBackend>) -> AdminContext {
    AdminContext::with_transport(
        Config::default(),
        Arc::new(MemoryTokenStore::with_token("test-token")),
        backend,
    )
}

fn envelope(items: JsonValue) -> JsonValue {
    let total = items.as_array().map(|a| a.len()).unwrap_or(0);
    json!({
        "success": true,
        "result": { "data": items, "pagination": { "page": 1, "limit": 10, "total": total } }
    })
}

// ============================================================================
// Users
// ============================================================================

/// A user whose status lives in the fake backend
fn user_backend() -> Arc<FakeBackend> {
    let status = Arc::new(Mutex::new("Active".to_string()));
    let read = Arc::clone(&status);
    let write = Arc::clone(&status);

    Arc::new(
        FakeBackend::default()
            .route(Method::Get, "/users", move |_| {
                let current = read.lock().unwrap().clone();
                Ok(ApiResponse::json_ok(&envelope(
                    json!([{ "_id": "u1", "email": "ada@example.com", "status": current }]),
                )))
            })
            .route(Method::Put, "/users/u1/status", move |req| {
                if let RequestBody::Json(body) = &req.body {
                    *write.lock().unwrap() = body["status"].as_str().unwrap_or_default().to_string();
                }
                Ok(ApiResponse::json_ok(&json!({ "success": true })))
            }),
    )
}

#[tokio::test]
async fn test_setting_same_status_twice_is_stable() {
    let backend = user_backend();
    let ctx = context(Arc::clone(&backend));
    let users = &ctx.user_service;
    let query = ListQuery::default();

    let mut seen = Vec::new();
    for _ in 0..2 {
        let outcome = confirm_and_mutate(
            &AutoConfirm,
            "Block ada@example.com?",
            || users.set_status("u1", UserStatus::Blocked),
            || users.list(&query),
        )
        .await;
        let (_, refreshed) = outcome.into_result().unwrap();
        seen.push(refreshed.unwrap().items[0]["status"].clone());
    }

    assert_eq!(seen, vec![json!("Blocked"), json!("Blocked")]);
    assert_eq!(backend.count(Method::Put, "/users/u1/status"), 2);
    assert_eq!(backend.count(Method::Get, "/users"), 2);

    let bodies: Vec<RequestBody> = backend
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::Put)
        .map(|r| r.body)
        .collect();
    assert_eq!(bodies[0], bodies[1], "absolute status, not a toggle");
}

#[tokio::test]
async fn test_failed_mutation_does_not_refetch() {
    let backend = Arc::new(FakeBackend::default().failing(Method::Delete, "/users/u1", 500));
    let ctx = context(Arc::clone(&backend));
    let query = ListQuery::default();

    let outcome = confirm_and_mutate(
        &AutoConfirm,
        "Delete user?",
        || ctx.user_service.delete("u1"),
        || ctx.user_service.list(&query),
    )
    .await;

    match outcome {
        MutationOutcome::Failed(e) => assert_eq!(e.status(), Some(500)),
        other => panic!("expected failure, got {:?}", other.is_applied()),
    }
    assert_eq!(backend.count(Method::Get, "/users"), 0);
}

// ============================================================================
// KYC
// ============================================================================

#[tokio::test]
async fn test_kyc_status_filter_applied_locally() {
    // Backend ignores the status filter and returns everything
    let backend = Arc::new(FakeBackend::default().json(
        Method::Get,
        "/kyc/admin/list",
        envelope(json!([
            { "_id": "k1", "status": "Approved" },
            { "_id": "k2", "status": "Pending" },
            { "_id": "k3", "status": "Approved" },
            { "_id": "k4", "status": "Pending" },
            { "_id": "k5", "status": "Rejected" }
        ])),
    ));
    let ctx = context(Arc::clone(&backend));

    let page = ctx
        .kyc_service
        .list(&ListQuery::default().filter("status", "Approved"))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(backend.requests()[0].query_value("status"), Some("Approved"));
}

#[tokio::test]
async fn test_kyc_rejection_requires_reason() {
    let backend = Arc::new(FakeBackend::default());
    let ctx = context(Arc::clone(&backend));

    let err = ctx
        .kyc_service
        .verify("k1", KycDecision::Rejected, Some("  "))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(backend.requests().is_empty());
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn test_dashboard_survives_failing_endpoints() {
    let backend = Arc::new(
        FakeBackend::default()
            .failing(Method::Get, "/users", 500)
            .failing(Method::Get, "/withdrawals/admin", 503)
            .json(
                Method::Get,
                "/purchase/admin/purchases",
                envelope(json!([
                    { "user": { "_id": "u1" }, "totalAmount": 500 },
                    { "user": { "_id": "u1" }, "totalAmount": 300 },
                    { "user": { "_id": "u2" }, "totalAmount": 200 }
                ])),
            )
            .json(
                Method::Get,
                "/kyc/admin/list",
                json!({ "data": [{ "status": "Pending" }] }),
            ),
    );
    let ctx = context(Arc::clone(&backend));

    let stats = ctx.dashboard_service.stats().await;

    assert_eq!(stats.total_users, 0);
    assert_eq!(stats.withdrawals_total, 0);
    assert_eq!(stats.kyc_pending, 1);
    assert_eq!(stats.total_purchases_count, 3);
    assert_eq!(stats.unique_user_ids, 2);
    assert_eq!(stats.avg_accounts_per_user, "1.50");
    assert_eq!(stats.purchase_total_revenue, Decimal::new(1000, 0));
    // users, kyc, purchases, withdrawals, transactions, tickets
    assert_eq!(backend.requests().len(), 6);
}

// ============================================================================
// Transactions export
// ============================================================================

#[tokio::test]
async fn test_export_writes_single_named_file() {
    let backend = Arc::new(FakeBackend::default().route(
        Method::Get,
        "/transactions/admin/export",
        |_| {
            Ok(ApiResponse {
                status: 200,
                content_type: Some("text/csv".to_string()),
                body: b"id,type,amount\nt1,deposit,100\nt2,withdrawal,40\n".to_vec(),
            })
        },
    ));
    let ctx = context(Arc::clone(&backend));
    let dir = TempDir::new().unwrap();

    let query = ListQuery::default().filter("type", "deposit").page(3);
    let result = ctx
        .transaction_service
        .export(&query, dir.path())
        .await
        .unwrap();

    assert_eq!(result.rows, Some(2));
    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
    assert_eq!(
        result.path.file_name().unwrap().to_str(),
        Some("transactions_export.csv")
    );

    let request = &backend.requests()[0];
    assert_eq!(request.query_value("type"), Some("deposit"));
    assert_eq!(request.query_value("page"), None);
}

#[tokio::test]
async fn test_export_saves_latin1_blob_unchanged() {
    let blob: &[u8] = b"id,name,amount\n1,Jos\xe9,10\n";
    let backend = Arc::new(FakeBackend::default().route(
        Method::Get,
        "/transactions/admin/export",
        move |_| {
            Ok(ApiResponse {
                status: 200,
                content_type: Some("text/csv".to_string()),
                body: blob.to_vec(),
            })
        },
    ));
    let ctx = context(Arc::clone(&backend));
    let dir = TempDir::new().unwrap();

    let result = ctx
        .transaction_service
        .export(&ListQuery::default(), dir.path())
        .await
        .unwrap();

    assert_eq!(result.rows, Some(1));
    assert_eq!(result.bytes, blob.len());
    assert_eq!(std::fs::read(&result.path).unwrap(), blob);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

// ============================================================================
// Content
// ============================================================================

#[tokio::test]
async fn test_faq_singular_route_fallback() {
    let backend = Arc::new(FakeBackend::default().json(
        Method::Get,
        "/content/admin/faq",
        json!({ "result": [
            { "_id": "f1", "question": "What is a challenge?" },
            { "_id": "f2", "question": "How are payouts made?" }
        ]}),
    ));
    let ctx = context(Arc::clone(&backend));

    let page = ctx.content_service.faqs(&ListQuery::default()).await.unwrap();
    assert_eq!(page.items.len(), 2);

    // Neither by-id route exists; the list lookup finds it
    let faq = ctx.content_service.faq("f2").await.unwrap();
    assert_eq!(faq["question"], "How are payouts made?");

    let err = ctx.content_service.faq("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_missing_news_reads_as_empty() {
    let backend = Arc::new(FakeBackend::default());
    let ctx = context(backend);

    let page = ctx.content_service.news(&ListQuery::default()).await.unwrap();
    assert!(page.items.is_empty());

    // Blogs are not on the 404-as-empty list
    assert!(ctx.content_service.blogs(&ListQuery::default()).await.is_err());
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_login_then_logout() {
    let backend = Arc::new(
        FakeBackend::default()
            .json(
                Method::Post,
                "/admin/login",
                json!({ "result": { "accessToken": "jwt-1", "refreshToken": "r-1" } }),
            )
            .failing(Method::Post, "/admin/logout", 500),
    );
    let tokens = Arc::new(MemoryTokenStore::new());
    let ctx = AdminContext::with_transport(Config::default(), tokens.clone(), backend);

    ctx.auth_service
        .login("ops@propdesk.io", "correct-horse")
        .await
        .unwrap();
    assert_eq!(ctx.tokens.token().as_deref(), Some("jwt-1"));

    ctx.auth_service.logout().await.unwrap();
    assert!(ctx.tokens.token().is_none());
}

// ============================================================================
// List controller
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_list_controller_search_sends_one_request() {
    let backend = Arc::new(FakeBackend::default().route(Method::Get, "/users", |req| {
        let needle = req.query_value("search").unwrap_or_default().to_string();
        Ok(ApiResponse::json_ok(&envelope(json!([{ "email": needle }]))))
    }));
    let ctx = context(Arc::clone(&backend));
    let list = ctx.list_controller("/users");

    let (first, last) = tokio::join!(list.type_search("ad"), async {
        tokio::time::sleep(Duration::from_millis(150)).await;
        list.type_search("ada").await
    });

    assert!(first.unwrap().is_none());
    assert_eq!(last.unwrap().unwrap().items[0]["email"], "ada");
    assert_eq!(backend.count(Method::Get, "/users"), 1);
}
