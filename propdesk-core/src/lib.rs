//! PropDesk Core - admin client for a trading-challenge platform
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: pure logic over opaque backend records (envelope extraction,
//!   aggregation, filtering, validation)
//! - **ports**: trait definitions for the network and session storage
//! - **services**: one service per admin area, plus the list controller and
//!   the confirm-and-mutate helper
//! - **adapters**: reqwest transport, session file and in-memory token stores

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::http::HttpTransport;
use adapters::token_store::{FileTokenStore, MemoryTokenStore};
use api::ApiClient;
use config::Config;
use ports::{TokenStore, Transport};
use services::*;

pub use domain::result::{Error, OperationResult};
pub use domain::{ListQuery, Page, Pagination, Session};

/// Environment variable holding a token that bypasses the session file
pub const TOKEN_ENV: &str = "PROPDESK_TOKEN";

/// Main context for PropDesk operations
///
/// Holds the configuration, the session store, the shared API client and
/// every service.
pub struct AdminContext {
    pub config: Config,
    pub tokens: Arc<dyn TokenStore>,
    pub client: ApiClient,
    pub auth_service: AuthService,
    pub subadmin_service: SubAdminService,
    pub user_service: UserService,
    pub kyc_service: KycService,
    pub purchase_service: PurchaseService,
    pub stage_service: StageService,
    pub transaction_service: TransactionService,
    pub withdrawal_service: WithdrawalService,
    pub security_service: SecurityService,
    pub support_service: SupportService,
    pub content_service: ContentService,
    pub referral_service: ReferralService,
    pub course_service: CourseService,
    pub dashboard_service: DashboardService,
}

impl AdminContext {
    /// Create a context from the PropDesk directory.
    ///
    /// `PROPDESK_TOKEN`, when set, replaces the session file with an
    /// in-memory session holding that token.
    pub fn new(propdesk_dir: &Path) -> Result<Self> {
        let config = Config::load(propdesk_dir)?;

        let tokens: Arc<dyn TokenStore> = match std::env::var(TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => {
                Arc::new(MemoryTokenStore::with_token(token.trim()))
            }
            _ => Arc::new(FileTokenStore::new(propdesk_dir)),
        };

        let transport = Arc::new(HttpTransport::new(
            &config.base_url,
            config.timeout,
            Arc::clone(&tokens),
        )?);

        Ok(Self::with_transport(config, tokens, transport))
    }

    /// Create a context over any transport (tests, alternative backends)
    pub fn with_transport(
        config: Config,
        tokens: Arc<dyn TokenStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let client = ApiClient::new(transport, config.not_found_as_empty.clone());

        Self {
            auth_service: AuthService::new(client.clone(), Arc::clone(&tokens)),
            subadmin_service: SubAdminService::new(client.clone()),
            user_service: UserService::new(client.clone()),
            kyc_service: KycService::new(client.clone()),
            purchase_service: PurchaseService::new(client.clone()),
            stage_service: StageService::new(client.clone()),
            transaction_service: TransactionService::new(client.clone()),
            withdrawal_service: WithdrawalService::new(client.clone()),
            security_service: SecurityService::new(client.clone()),
            support_service: SupportService::new(client.clone()),
            content_service: ContentService::new(client.clone()),
            referral_service: ReferralService::new(client.clone()),
            course_service: CourseService::new(client.clone()),
            dashboard_service: DashboardService::new(client.clone()),
            config,
            tokens,
            client,
        }
    }

    /// List controller for a paginated endpoint, using the configured page
    /// size and search debounce
    pub fn list_controller(&self, path: &str) -> ListController {
        ListController::new(
            self.client.clone(),
            path,
            self.config.page_size,
            self.config.search_debounce(),
        )
    }
}
