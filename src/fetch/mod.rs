//! Page fetch helper.
//!
//! Best-effort HTTP GET used by the restaurant menu handlers. Origin
//! servers tend to reject obvious non-browser clients, so requests carry
//! a fixed desktop-browser user-agent. All failure paths degrade to an
//! empty string; callers treat empty as "unavailable".

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

/// User-agent sent with every page fetch.
///
/// Some menu pages refuse requests without a browser-looking UA.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64) \
     AppleWebKit/537.11 (KHTML, like Gecko) \
     Chrome/23.0.1271.95 Safari/537.11";

/// Fetches web pages as plain text.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Creates a fetcher with the fixed browser user-agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client })
    }

    /// Fetches a page and returns its body with line breaks removed.
    ///
    /// Returns an empty string for a malformed URL, a failed request, or
    /// a non-success status.
    pub async fn page_source(&self, url: &str) -> String {
        self.get(url, false).await
    }

    /// Like [`page_source`](Self::page_source), but an HTTP 404 response
    /// still yields its body instead of an empty string.
    ///
    /// Some origins serve useful content (e.g. a fallback page) with a
    /// 404 status.
    pub async fn page_source_ignore_not_found(&self, url: &str) -> String {
        self.get(url, true).await
    }

    async fn get(&self, url: &str, tolerate_not_found: bool) -> String {
        // A malformed URL surfaces as a builder error on send.
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Page fetch failed for '{}': {}", url, e);
                return String::new();
            }
        };

        let status = response.status();
        let acceptable = status.is_success()
            || (tolerate_not_found && status == StatusCode::NOT_FOUND);
        if !acceptable {
            debug!("Page fetch for '{}' returned status {}", url, status);
            return String::new();
        }

        match response.text().await {
            Ok(body) => concat_lines(&body),
            Err(e) => {
                debug!("Failed to read body from '{}': {}", url, e);
                String::new()
            }
        }
    }
}

/// Joins all lines of a body with no separator.
fn concat_lines(body: &str) -> String {
    body.lines().collect()
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serves exactly one connection with a canned HTTP response and
    /// returns the address to request.
    async fn one_shot_server(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                // Drain the request before responding.
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;

                let response = format!(
                    "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        format!("http://{addr}/")
    }

    fn fetcher() -> PageFetcher {
        PageFetcher::new().unwrap()
    }

    #[test]
    fn test_concat_lines() {
        assert_eq!(concat_lines("a\nb\nc"), "abc");
        assert_eq!(concat_lines("single"), "single");
        assert_eq!(concat_lines(""), "");
        assert_eq!(concat_lines("trailing\n"), "trailing");
    }

    #[tokio::test]
    async fn test_malformed_url_returns_empty() {
        assert_eq!(fetcher().page_source("not a url").await, "");
        assert_eq!(
            fetcher().page_source_ignore_not_found("not a url").await,
            ""
        );
    }

    #[tokio::test]
    async fn test_success_body_line_concatenated() {
        let url = one_shot_server("HTTP/1.1 200 OK", "hello\nworld").await;
        assert_eq!(fetcher().page_source(&url).await, "helloworld");
    }

    #[tokio::test]
    async fn test_not_found_discarded_by_default() {
        let url = one_shot_server("HTTP/1.1 404 Not Found", "missing").await;
        assert_eq!(fetcher().page_source(&url).await, "");
    }

    #[tokio::test]
    async fn test_not_found_body_kept_in_tolerant_mode() {
        let url = one_shot_server("HTTP/1.1 404 Not Found", "missing").await;
        assert_eq!(fetcher().page_source_ignore_not_found(&url).await, "missing");
    }

    #[tokio::test]
    async fn test_server_error_returns_empty_even_in_tolerant_mode() {
        let url = one_shot_server("HTTP/1.1 500 Internal Server Error", "oops").await;
        assert_eq!(fetcher().page_source_ignore_not_found(&url).await, "");
    }

    #[tokio::test]
    async fn test_unreachable_server_returns_empty() {
        // Nothing listens here; bind-then-drop frees the port.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        assert_eq!(fetcher().page_source(&format!("http://{addr}/")).await, "");
    }
}
