//! Pure helpers shared by request building and response parsing

pub mod form;
pub mod path;
