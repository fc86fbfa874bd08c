//! HTTP fetcher
//!
//! Builds the shared HTTP client and performs single page fetches with the
//! crawl's timeout. Outcomes are typed so the worker loop can translate
//! each failure class into the right audit row: real status for HTTP and
//! decode failures, `-1` for transport failures.

use crate::config::UserAgentConfig;
use crate::FetchError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// A successfully fetched, decoded page
#[derive(Debug)]
pub struct FetchedPage {
    /// HTTP status code (always 200; other statuses surface as errors)
    pub status: u16,

    /// Major part of the Content-Type, e.g. `text` for `text/html`
    pub mime_major: String,

    /// Decoded response body
    pub body: String,
}

/// Builds the HTTP client shared by fetches, robots lookups, and seed
/// searches
///
/// The user agent is formatted `name/version (+contact-url; contact-email)`
/// so site operators can identify and reach the crawler's owner.
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page
///
/// * Transport problems (timeout, DNS, refused connection, unfetchable
///   URL) become [`FetchError::Transport`].
/// * A response with any status other than 200 becomes
///   [`FetchError::Status`]; its body is not read.
/// * A 200 response whose body is not valid UTF-8 becomes
///   [`FetchError::Decode`].
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = response.status();
    let mime_major = mime_major_of(
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
    );

    if status != StatusCode::OK {
        return Err(FetchError::Status(status.as_u16()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let body = String::from_utf8(bytes.to_vec()).map_err(|_| FetchError::Decode {
        status: status.as_u16(),
    })?;

    Ok(FetchedPage {
        status: status.as_u16(),
        mime_major,
        body,
    })
}

/// Extracts the lowercased major type from a Content-Type header value
///
/// A missing or unreadable header defaults to `text`, so header-less 200
/// responses still reach the parser.
fn mime_major_of(content_type: Option<&str>) -> String {
    match content_type {
        Some(value) => value
            .split('/')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase(),
        None => "text".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_major_html() {
        assert_eq!(mime_major_of(Some("text/html; charset=utf-8")), "text");
    }

    #[test]
    fn test_mime_major_case_folded() {
        assert_eq!(mime_major_of(Some("TEXT/HTML")), "text");
    }

    #[test]
    fn test_mime_major_non_text() {
        assert_eq!(mime_major_of(Some("application/pdf")), "application");
        assert_eq!(mime_major_of(Some("image/png")), "image");
    }

    #[test]
    fn test_mime_major_missing_defaults_to_text() {
        assert_eq!(mime_major_of(None), "text");
    }

    #[test]
    fn test_build_http_client() {
        let config = UserAgentConfig::default();
        assert!(build_http_client(&config, Duration::from_secs(4)).is_ok());
    }

    #[tokio::test]
    async fn test_unfetchable_url_is_transport_error() {
        let config = UserAgentConfig::default();
        let client = build_http_client(&config, Duration::from_secs(4)).unwrap();

        let err = fetch_page(&client, "sibling.html").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
