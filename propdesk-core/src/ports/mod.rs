//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. Services depend
//! only on these traits: the network behind [`Transport`] and the session
//! storage behind [`TokenStore`].

mod token_store;
mod transport;

pub use token_store::TokenStore;
pub use transport::{ApiRequest, ApiResponse, FormPart, Method, RequestBody, Transport};
