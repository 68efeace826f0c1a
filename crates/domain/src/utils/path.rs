//! Endpoint path normalization

/// Normalize one endpoint segment.
///
/// The result has exactly one leading slash, no empty components and no
/// trailing slash. Blank input (or input made only of slashes) yields an
/// empty string, which callers treat as a no-op.
pub fn normalize_segment(segment: &str) -> String {
    let mut normalized = String::with_capacity(segment.len() + 1);
    for component in segment.split('/').filter(|component| !component.is_empty()) {
        normalized.push('/');
        normalized.push_str(component);
    }
    normalized
}

/// Split a server-supplied paging URL into endpoint path and query string.
///
/// The path starts at the first `/` found after the first 8 characters,
/// which skips the `https://` scheme and lands after the host.
pub fn split_paging_url(url: &str) -> (&str, &str) {
    let path_start = url.get(8..).and_then(|tail| tail.find('/')).map(|offset| offset + 8);
    let path_and_query = match path_start {
        Some(start) => &url[start..],
        None => url.find('?').map_or("", |start| &url[start..]),
    };
    path_and_query.split_once('?').unwrap_or((path_and_query, ""))
}
