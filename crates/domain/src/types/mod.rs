//! Domain types for graph requests and responses

pub mod identity;
pub mod params;
pub mod request;
pub mod response;

pub use identity::{ClientIdentity, TokenState};
pub use params::{ParamValue, Params};
pub use request::{GraphRequest, Method};
pub use response::{GraphFailure, GraphResponse, GraphSuccess};
