//! HTML anchor extraction

use scraper::{Html, Selector};

/// Extracts the `href` of every `<a href>` element, in document order
///
/// Anchors without an `href` attribute are skipped; hrefs are returned raw,
/// with resolution against the page origin left to the normalizer.
/// Malformed HTML never fails: the parser recovers and yields whatever
/// anchors it can find.
pub fn extract_anchors(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}
