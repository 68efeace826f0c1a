//! Endpoint path accumulation

use goplay_domain::utils::path::normalize_segment;

/// Accumulates normalized path segments for one call chain
///
/// ```
/// use goplay_core::graph::EndpointBuilder;
///
/// let mut path = EndpointBuilder::new();
/// path.extend("pbgspub").extend("/players/").extend("");
/// assert_eq!(path.current_path(), "/pbgspub/players");
///
/// path.reset();
/// assert!(path.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointBuilder {
    path: String,
}

impl EndpointBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment. Blank segments are ignored.
    pub fn extend(&mut self, segment: &str) -> &mut Self {
        self.path.push_str(&normalize_segment(segment));
        self
    }

    pub fn current_path(&self) -> &str {
        &self.path
    }

    pub fn reset(&mut self) {
        self.path.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}
