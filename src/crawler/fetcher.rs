//! HTTP fetcher implementation
//!
//! The fetch capability used by [`crate::Page::load`]. The rest of the crate
//! never touches sockets directly; everything network-shaped funnels through
//! [`fetch_url`] so failures map onto a single error taxonomy.

use crate::FetchError;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client shared by all workers
///
/// Redirects follow reqwest's default policy (up to 10 hops); the page is
/// recorded under the URL it was admitted as, not the redirect target.
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, returning the response body on success
///
/// A non-success status is an error here. The caller records the page as
/// failed; the crawl itself continues.
pub async fn fetch_url(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| classify_error(url, e))
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
