//! Transaction service - ledger listing, stats and CSV export

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::domain::aggregate::{count_where, sum_decimal};
use crate::domain::result::Result;
use crate::domain::{ListQuery, Page};

pub const TRANSACTIONS_PATH: &str = "/transactions/admin/all";
pub const EXPORT_FILE_NAME: &str = "transactions_export.csv";

/// Result of a CSV export
#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    pub path: PathBuf,
    pub bytes: usize,
    /// Data rows, excluding the header; `None` when the blob does not parse as CSV
    pub rows: Option<usize>,
}

/// Totals over one page of transactions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub count: usize,
    pub total_amount: Decimal,
    pub deposits: usize,
    pub withdrawals: usize,
    pub purchases: usize,
    pub completed: usize,
}

impl TransactionSummary {
    pub fn from_items(items: &[JsonValue]) -> Self {
        Self {
            count: items.len(),
            total_amount: sum_decimal(items, "amount"),
            deposits: count_where(items, "type", "deposit"),
            withdrawals: count_where(items, "type", "withdrawal"),
            purchases: count_where(items, "type", "purchase"),
            completed: count_where(items, "status", "completed"),
        }
    }
}

/// Count data rows in a CSV blob. Fields are not decoded, so any encoding
/// is accepted.
fn count_rows(bytes: &[u8]) -> csv::Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let mut rows = 0;
    for record in reader.byte_records() {
        record?;
        rows += 1;
    }
    Ok(rows)
}

/// Transaction ledger
#[derive(Clone)]
pub struct TransactionService {
    client: ApiClient,
}

impl TransactionService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Transactions (`type`, `status`, `startDate`, `endDate`, `search`)
    pub async fn list(&self, query: &ListQuery) -> Result<Page<JsonValue>> {
        self.client.get_page(TRANSACTIONS_PATH, query).await
    }

    pub async fn stats(&self) -> Result<JsonValue> {
        self.client.get_object("/transactions/admin/stats").await
    }

    /// Download the CSV export into `dir` as `transactions_export.csv`.
    ///
    /// Filters from `query` are forwarded; paging is not. The blob is saved
    /// as received; the row count is informational only.
    pub async fn export(&self, query: &ListQuery, dir: &Path) -> Result<ExportResult> {
        let mut params: Vec<(String, String)> = query
            .filters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if !query.search.trim().is_empty() {
            params.push(("search".to_string(), query.search.trim().to_string()));
        }

        let bytes = self
            .client
            .download("/transactions/admin/export", params)
            .await?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(EXPORT_FILE_NAME);
        std::fs::write(&path, &bytes)?;

        let rows = match count_rows(&bytes) {
            Ok(rows) => Some(rows),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "export saved but could not be parsed as CSV");
                None
            }
        };
        info!(path = %path.display(), bytes = bytes.len(), ?rows, "transactions exported");

        Ok(ExportResult {
            path,
            bytes: bytes.len(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_count_rows() {
        assert_eq!(count_rows(b"id,amount\n1,10\n2,20\n").unwrap(), 2);
        assert_eq!(count_rows(b"id,amount\n").unwrap(), 0);
        assert_eq!(count_rows(b"").unwrap(), 0);
    }

    #[test]
    fn test_count_rows_accepts_non_utf8_fields() {
        assert_eq!(count_rows(b"id,name,amount\n1,Jos\xe9,10\n").unwrap(), 1);
    }

    #[test]
    fn test_summary() {
        let items = vec![
            json!({"type": "deposit", "amount": 100, "status": "completed"}),
            json!({"type": "withdrawal", "amount": "-40.5", "status": "pending"}),
            json!({"type": "purchase", "amount": null}),
        ];
        let summary = TransactionSummary::from_items(&items);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_amount, Decimal::new(595, 1));
        assert_eq!(summary.deposits, 1);
        assert_eq!(summary.withdrawals, 1);
        assert_eq!(summary.completed, 1);
    }
}
