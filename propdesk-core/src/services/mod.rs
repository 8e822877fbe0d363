//! Service layer - one service per admin area
//!
//! Services turn admin operations into REST calls through the shared
//! [`ApiClient`](crate::api::ApiClient) and derive whatever the console shows
//! on top of the raw responses. They hold no domain state of their own.

pub mod auth;
pub mod content;
pub mod courses;
pub mod dashboard;
pub mod kyc;
pub mod list_view;
pub mod logging;
pub mod mutation;
pub mod purchase;
pub mod referrals;
pub mod security;
pub mod stages;
pub mod subadmins;
pub mod support;
pub mod transactions;
pub mod users;
pub mod withdrawals;

/// Page size used when a whole collection is fetched for aggregation
pub const AGGREGATE_LIMIT: u32 = 1000;

pub use auth::AuthService;
pub use content::{ArticleInput, ContentService, FaqInput, ImageUpload};
pub use courses::{CourseInput, CourseService, VideoInput};
pub use dashboard::{compute_dashboard, DashboardService, DashboardSources, DashboardStats};
pub use kyc::KycService;
pub use list_view::ListController;
pub use logging::{LogEntry, LogEvent, LogStats, LoggingService};
pub use mutation::{confirm_and_mutate, AutoConfirm, Confirmer, MutationOutcome};
pub use purchase::{DiscountInput, PlanInput, PurchaseService, PurchaseStats};
pub use referrals::ReferralService;
pub use security::SecurityService;
pub use stages::StageService;
pub use subadmins::{SubAdminInput, SubAdminService};
pub use support::SupportService;
pub use transactions::{ExportResult, TransactionService, TransactionSummary};
pub use users::UserService;
pub use withdrawals::{WithdrawalPage, WithdrawalService, WithdrawalStats};
