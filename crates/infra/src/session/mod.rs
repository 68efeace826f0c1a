//! Session store backends

pub mod ttl_store;

pub use ttl_store::TtlSessionStore;
