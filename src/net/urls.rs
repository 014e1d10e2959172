//! URL utilities for path-id threading and cache-save gating
//!
//! The destination URL travels through redirect chains carrying a `pathid`
//! query parameter. Cached URLs are stored with the parameter removed so a
//! stale cache can later be refreshed by re-appending the stored id to the
//! configured source URL.

use url::Url;

/// Query parameter used as a stable handle across redirect hops.
pub const PATH_ID_PARAM: &str = "pathid";

/// Extract the `pathid` query value from a URL, if present.
///
/// The parameter name is matched case-insensitively; the first match wins.
pub fn extract_path_id(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(name, _)| name.eq_ignore_ascii_case(PATH_ID_PARAM))
        .map(|(_, value)| value.into_owned())
}

/// Remove the `pathid` query parameter, returning the canonicalized URL.
///
/// Idempotent. Unparseable input is returned unchanged.
pub fn strip_path_id(url_str: &str) -> String {
    let Ok(url) = Url::parse(url_str) else {
        return url_str.to_string();
    };

    let remaining: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| !name.eq_ignore_ascii_case(PATH_ID_PARAM))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    let mut stripped = url.clone();
    if remaining.is_empty() {
        stripped.set_query(None);
    } else {
        stripped.query_pairs_mut().clear().extend_pairs(remaining).finish();
    }
    stripped.to_string()
}

/// Append `pathid=<id>` to a URL's query, preserving existing parameters.
///
/// Returns `None` when the base URL does not parse.
pub fn append_path_id(url_str: &str, path_id: &str) -> Option<String> {
    let mut url = Url::parse(url_str).ok()?;
    url.query_pairs_mut().append_pair(PATH_ID_PARAM, path_id);
    Some(url.to_string())
}

/// Coarse same-site check: compare the last two dot-separated labels of
/// each host. A host with fewer than two labels is its own base domain.
pub fn same_base_domain(url_a: &str, url_b: &str) -> bool {
    match (host_of(url_a), host_of(url_b)) {
        (Some(a), Some(b)) => base_domain(&a) == base_domain(&b),
        // Unparseable on either side: treat as different sites.
        _ => false,
    }
}

fn host_of(url_str: &str) -> Option<String> {
    Url::parse(url_str).ok()?.host_str().map(str::to_string)
}

fn base_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() >= 2 {
        labels[labels.len() - 2..].join(".")
    } else {
        host.to_string()
    }
}
