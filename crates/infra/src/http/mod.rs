//! HTTP transport for graph calls

pub mod executor;

pub use executor::{HttpExecutor, HttpExecutorBuilder};
