//! HTTP fetch layer with bounded retry
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building HTTP clients with an identifying user agent string
//! - GET requests for search and detail pages
//! - Retry with doubling backoff for transient failures
//! - Error classification

use crate::config::ClientConfig;
use crate::NetworkError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Raw response from a successful GET
#[derive(Debug)]
pub struct RawResponse {
    /// HTTP status code (always in the success range)
    pub status: u16,

    /// Response body
    pub body: String,

    /// Final URL after any redirects
    pub final_url: String,
}

/// Statuses worth retrying: transient server errors and rate limiting
const RETRYABLE_STATUSES: [u16; 4] = [500, 502, 504, 429];

/// First backoff delay; doubles with each further attempt
const BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Builds an HTTP client that identifies itself to origin operators
///
/// User agent format: `ScraperName/Version (+ContactURL; ContactEmail)`,
/// so an operator seeing abusive traffic can find out who to contact or
/// what to block.
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.scraper_name, config.scraper_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, retrying transient failures with doubling backoff
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | 2xx | Return body, never an error |
/// | 500 / 502 / 504 / 429 | Retry up to `max_retries` times |
/// | Other 4xx / 5xx | Immediate `NetworkError::Status` |
/// | Timeout, connection refused | Retry up to `max_retries` times |
/// | Other transport errors | Immediate `NetworkError::Transport` |
///
/// The delay between attempts doubles each time, starting at 500ms.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `query` - Query parameters to append, may be empty
/// * `max_retries` - Upper bound on retries after the initial attempt
pub async fn fetch_page(
    client: &Client,
    url: &str,
    query: &[(String, String)],
    max_retries: u32,
) -> Result<RawResponse, NetworkError> {
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        let mut request = client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    let final_url = response.url().to_string();
                    let body = response.text().await.map_err(|e| NetworkError::Transport {
                        url: url.to_string(),
                        source: e,
                    })?;
                    return Ok(RawResponse {
                        status: status.as_u16(),
                        body,
                        final_url,
                    });
                }

                if !is_retryable_status(status) {
                    return Err(NetworkError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }

                if attempt > max_retries {
                    return Err(NetworkError::RetriesExhausted {
                        url: url.to_string(),
                        status: status.as_u16(),
                        attempts: attempt,
                    });
                }

                tracing::warn!(
                    "HTTP {} from {}, retrying (attempt {}/{})",
                    status.as_u16(),
                    url,
                    attempt,
                    max_retries + 1
                );
            }
            Err(e) => {
                let retryable = e.is_timeout() || e.is_connect();

                if !retryable || attempt > max_retries {
                    return Err(classify_transport_error(url, e));
                }

                tracing::warn!(
                    "Request to {} failed ({}), retrying (attempt {}/{})",
                    url,
                    e,
                    attempt,
                    max_retries + 1
                );
            }
        }

        tokio::time::sleep(backoff_delay(attempt)).await;
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    RETRYABLE_STATUSES.contains(&status.as_u16())
}

fn classify_transport_error(url: &str, error: reqwest::Error) -> NetworkError {
    if error.is_timeout() {
        NetworkError::Timeout {
            url: url.to_string(),
        }
    } else {
        NetworkError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Doubles with each attempt: 500ms, 1s, 2s, ...
fn backoff_delay(attempt: u32) -> Duration {
    BACKOFF_BASE * 2u32.saturating_pow(attempt.saturating_sub(1))
}
