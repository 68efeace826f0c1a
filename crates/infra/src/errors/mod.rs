//! Error conversions for infrastructure types

pub mod conversions;

pub use conversions::IntoGraphError;
