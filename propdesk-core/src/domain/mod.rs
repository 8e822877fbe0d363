//! Core domain logic
//!
//! Backend entities stay opaque JSON; what lives here is the pure logic the
//! console applies to them (envelope extraction, aggregation, filtering,
//! validation) plus the small typed values it sends back. No I/O.

pub mod aggregate;
pub mod envelope;
pub mod fields;
pub mod filter;
pub mod query;
pub mod result;
mod session;
mod status;
pub mod validation;

pub use envelope::{extract_list, Page, Pagination, DEFAULT_LIST_PATHS};
pub use query::ListQuery;
pub use session::{Session, ACCESS_TOKEN_KEY};
pub use status::{KycDecision, TicketStatus, UserStatus};
