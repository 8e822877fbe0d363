//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest HTTP client for the Transport port
//! - session.json / in-memory storage for the TokenStore port

pub mod http;
pub mod token_store;

#[cfg(test)]
pub mod mock_server;
