//! Token lifecycle for the publisher-credentials grant
//!
//! - [`TokenManager`] acquires, caches and counts failures of access tokens
//! - [`SessionStore`] is the port token state is persisted through
//! - [`InMemorySessionStore`] is the default process-local store

pub mod ports;
pub mod session;
pub mod token_manager;

pub use ports::SessionStore;
pub use session::InMemorySessionStore;
pub use token_manager::TokenManager;
