//! # GoPlay Domain
//!
//! Data types for the GoPlay publisher graph SDK.
//!
//! This crate contains:
//! - Publisher identity and cached token state
//! - Request descriptors and normalized response envelopes
//! - The error taxonomy and Result alias
//! - Configuration structures and wire constants
//! - The URL-encoded form codec
//!
//! ## Architecture
//! - No dependencies on other GoPlay crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
