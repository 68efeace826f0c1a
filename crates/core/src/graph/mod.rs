//! Graph call pipeline
//!
//! - [`EndpointBuilder`] accumulates the endpoint path
//! - [`ResponseParser`] normalizes raw bodies
//! - [`RequestExecutor`] is the transport port
//! - [`GraphClient`] ties them together with the expired-token retry

pub mod client;
pub mod endpoint;
pub mod parser;
pub mod ports;

pub use client::{GraphClient, GraphClientBuilder};
pub use endpoint::EndpointBuilder;
pub use parser::ResponseParser;
pub use ports::{CancellableExecutor, RequestExecutor};
