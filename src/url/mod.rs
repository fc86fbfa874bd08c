//! URL handling module for prowl
//!
//! Provides the link normalizer plus domain and origin extraction helpers
//! used by the frontier and the robots gate.

mod normalize;

pub use normalize::normalize_link;

use url::Url;

/// Extracts the domain (authority portion) from an absolute URL string
///
/// The domain is the key for the frontier's per-domain novelty table, so a
/// URL that cannot be parsed still yields a stable key: the empty string.
/// Such URLs fail later at fetch time and are logged as transport errors.
///
/// # Examples
///
/// ```
/// use prowl::extract_domain;
///
/// assert_eq!(extract_domain("https://example.com/path"), "example.com");
/// assert_eq!(extract_domain("http://example.com:8080/"), "example.com:8080");
/// assert_eq!(extract_domain("not a url"), "");
/// ```
pub fn extract_domain(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };

    let Some(host) = parsed.host_str() else {
        return String::new();
    };

    match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Reduces an absolute URL to its origin form `scheme://authority`
///
/// Returns `None` when the URL cannot be parsed or has no host. The result
/// carries no trailing slash, so callers can append an absolute path
/// directly without producing a doubled `/`.
pub fn origin_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;

    match parsed.port() {
        Some(port) => Some(format!("{}://{}:{}", parsed.scheme(), host, port)),
        None => Some(format!("{}://{}", parsed.scheme(), host)),
    }
}
