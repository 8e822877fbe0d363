//! List controller - page/search/filter state for a paginated endpoint
//!
//! Every state change issues exactly one fetch. Free-text search is
//! debounced: each keystroke restarts the timer and only the last one
//! fetches. Fetches are stamped with a generation number; a response whose
//! generation is no longer current is dropped, so a slow response can never
//! overwrite the result of a newer request.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::api::ApiClient;
use crate::domain::result::{Error, Result};
use crate::domain::{ListQuery, Page};

/// Marks a fetch in flight for as long as it is alive
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Paginated list state bound to one endpoint
pub struct ListController {
    client: ApiClient,
    path: String,
    query: Mutex<ListQuery>,
    current: Mutex<Option<Page<JsonValue>>>,
    generation: AtomicU64,
    search_ticket: AtomicU64,
    in_flight: AtomicUsize,
    debounce: Duration,
}

impl ListController {
    pub fn new(client: ApiClient, path: impl Into<String>, page_size: u32, debounce: Duration) -> Self {
        Self {
            client,
            path: path.into(),
            query: Mutex::new(ListQuery::new(page_size)),
            current: Mutex::new(None),
            generation: AtomicU64::new(0),
            search_ticket: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            debounce,
        }
    }

    /// Start from an existing query instead of the defaults
    pub fn with_query(self, query: ListQuery) -> Self {
        if let Ok(mut q) = self.query.lock() {
            *q = query;
        }
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn lock_query(&self) -> Result<MutexGuard<'_, ListQuery>> {
        self.query
            .lock()
            .map_err(|e| Error::Other(format!("Lock poisoned: {}", e)))
    }

    /// Snapshot of the current query state
    pub fn query(&self) -> ListQuery {
        self.query.lock().map(|q| q.clone()).unwrap_or_default()
    }

    /// Last accepted page
    pub fn current(&self) -> Option<Page<JsonValue>> {
        self.current.lock().ok().and_then(|c| c.clone())
    }

    /// Total pages reported by the last accepted response
    pub fn total_pages(&self) -> u32 {
        self.current()
            .map(|p| p.pagination.total_pages)
            .unwrap_or(0)
    }

    /// Whether any fetch is still in flight
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Current generation number (increments once per fetch)
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Fetch with the current state.
    ///
    /// Returns `Ok(None)` when a newer fetch started while this one was in
    /// flight; its response (or error) is discarded.
    pub async fn refresh(&self) -> Result<Option<Page<JsonValue>>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = self.query();

        let result = {
            let _loading = LoadingGuard::new(&self.in_flight);
            self.client.get_page(&self.path, &query).await
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(path = %self.path, generation, "discarding stale response");
            return Ok(None);
        }

        let page = result?;
        if let Ok(mut current) = self.current.lock() {
            *current = Some(page.clone());
        }
        Ok(Some(page))
    }

    pub async fn set_page(&self, page: u32) -> Result<Option<Page<JsonValue>>> {
        self.lock_query()?.page = page.max(1);
        self.refresh().await
    }

    pub async fn next_page(&self) -> Result<Option<Page<JsonValue>>> {
        let page = self.query().page + 1;
        let total = self.total_pages();
        if total > 0 && page > total {
            return Ok(self.current());
        }
        self.set_page(page).await
    }

    pub async fn prev_page(&self) -> Result<Option<Page<JsonValue>>> {
        let page = self.query().page;
        if page <= 1 {
            return Ok(self.current());
        }
        self.set_page(page - 1).await
    }

    /// Change the page size; goes back to page 1
    pub async fn set_limit(&self, limit: u32) -> Result<Option<Page<JsonValue>>> {
        {
            let mut q = self.lock_query()?;
            q.limit = limit.max(1);
            q.page = 1;
        }
        self.refresh().await
    }

    /// Change a categorical filter; goes back to page 1
    pub async fn set_filter(&self, key: &str, value: &str) -> Result<Option<Page<JsonValue>>> {
        {
            let mut q = self.lock_query()?;
            q.set_filter(key, value);
            q.page = 1;
        }
        self.refresh().await
    }

    /// Record a search keystroke.
    ///
    /// Waits for the debounce interval; if another keystroke arrived
    /// meanwhile this call returns `Ok(None)` without fetching.
    pub async fn type_search(&self, text: &str) -> Result<Option<Page<JsonValue>>> {
        let ticket = self.search_ticket.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.debounce).await;

        if self.search_ticket.load(Ordering::SeqCst) != ticket {
            return Ok(None);
        }

        {
            let mut q = self.lock_query()?;
            q.search = text.to_string();
            q.page = 1;
        }
        self.refresh().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ApiRequest, ApiResponse, Transport};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    /// Answers with the requested page number after a page-dependent delay
    struct SlowPages {
        calls: Mutex<Vec<ApiRequest>>,
        delays_ms: Vec<u64>,
        fail_page: Option<u32>,
    }

    impl SlowPages {
        fn new(delays_ms: Vec<u64>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                delays_ms,
                fail_page: None,
            }
        }

        fn calls(&self) -> Vec<ApiRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for SlowPages {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
            self.calls.lock().unwrap().push(request.clone());
            let page: u32 = request.query_value("page").unwrap_or("1").parse().unwrap();
            let delay = self.delays_ms.get(page as usize - 1).copied().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if self.fail_page == Some(page) {
                return Err(Error::Http { status: 500, message: "boom".into() });
            }
            Ok(ApiResponse::json_ok(&json!({
                "result": {
                    "data": [{"page": page, "search": request.query_value("search")}],
                    "pagination": {"page": page, "limit": 10, "total": 30}
                }
            })))
        }
    }

    fn controller(transport: Arc<SlowPages>) -> ListController {
        let client = ApiClient::new(transport, Vec::new());
        ListController::new(client, "/users", 10, Duration::from_millis(400))
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        // Page 1 answers after 200ms, page 2 after 10ms
        let transport = Arc::new(SlowPages::new(vec![200, 10]));
        let list = controller(Arc::clone(&transport));

        let (first, second) = tokio::join!(list.set_page(1), list.set_page(2));

        assert!(first.unwrap().is_none(), "older fetch must be dropped");
        let second = second.unwrap().unwrap();
        assert_eq!(second.items[0]["page"], 2);
        assert_eq!(list.current().unwrap().items[0]["page"], 2);
        assert_eq!(transport.calls().len(), 2);
        assert!(!list.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_error_is_discarded_too() {
        let transport = Arc::new(SlowPages {
            fail_page: Some(1),
            ..SlowPages::new(vec![100, 10])
        });
        let list = controller(Arc::clone(&transport));

        let (first, second) = tokio::join!(list.set_page(1), list.set_page(2));
        assert!(matches!(first, Ok(None)));
        assert!(second.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_debounced() {
        let transport = Arc::new(SlowPages::new(vec![0]));
        let list = controller(Arc::clone(&transport));

        let (a, b, c) = tokio::join!(
            list.type_search("a"),
            async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                list.type_search("al").await
            },
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                list.type_search("ali").await
            },
        );

        assert!(a.unwrap().is_none());
        assert!(b.unwrap().is_none());
        let page = c.unwrap().unwrap();
        assert_eq!(page.items[0]["search"], "ali");

        let calls = transport.calls();
        assert_eq!(calls.len(), 1, "exactly one fetch for a burst of keystrokes");
        assert_eq!(calls[0].query_value("search"), Some("ali"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_change_resets_page_and_fetches_once() {
        let transport = Arc::new(SlowPages::new(vec![0, 0, 0]));
        let list = controller(Arc::clone(&transport));

        list.set_page(3).await.unwrap();
        list.set_filter("status", "Blocked").await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].query_value("page"), Some("1"));
        assert_eq!(calls[1].query_value("status"), Some("Blocked"));
        assert_eq!(list.total_pages(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_cleared_after_error() {
        let transport = Arc::new(SlowPages {
            fail_page: Some(1),
            ..SlowPages::new(vec![50])
        });
        let list = controller(transport);

        let err = list.refresh().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(!list.is_loading());
        assert!(list.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_prev_page_stops_at_first() {
        let transport = Arc::new(SlowPages::new(vec![0]));
        let list = controller(Arc::clone(&transport));
        list.prev_page().await.unwrap();
        assert!(transport.calls().is_empty());
    }
}
