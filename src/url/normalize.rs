use crate::url::origin_of;

/// Turns a link reference discovered on a page into an absolute URL
///
/// `base_url` is the page the link was found on; only its origin
/// (`scheme://authority`) participates in resolution.
///
/// Rules, applied in order:
///
/// 1. Empty links, bare `#`, and fragment-only links are discarded.
/// 2. A fragment anywhere else is truncated at the first `#`.
/// 3. Scheme-relative links (`//host/path`) become `http://host/path`.
///    The base scheme is never inherited, not even for https pages.
/// 4. Absolute paths (`/path`) are joined onto the base origin.
/// 5. Anything else is returned unchanged; downstream fetch code is the
///    one that rejects opaque or relative leftovers.
///
/// Never errors; `None` is the only rejection signal.
///
/// # Examples
///
/// ```
/// use prowl::normalize_link;
///
/// let base = "http://a.test/page";
/// assert_eq!(normalize_link(base, "/x"), Some("http://a.test/x".to_string()));
/// assert_eq!(normalize_link(base, "#top"), None);
/// assert_eq!(
///     normalize_link(base, "//b.test/y"),
///     Some("http://b.test/y".to_string())
/// );
/// ```
pub fn normalize_link(base_url: &str, link: &str) -> Option<String> {
    if link.is_empty() || link.starts_with('#') {
        return None;
    }

    // Truncate at the first fragment marker
    let link = match link.find('#') {
        Some(idx) => &link[..idx],
        None => link,
    };

    if let Some(rest) = link.strip_prefix("//") {
        return Some(format!("http://{}", rest));
    }

    if link.starts_with('/') {
        let origin = origin_of(base_url)?;
        return Some(format!("{}{}", origin, link));
    }

    Some(link.to_string())
}
