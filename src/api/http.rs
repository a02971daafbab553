//! A GET helper with bounded retry/backoff.
//!
//! The bank statement API throttles aggressively; waiting out the backoff
//! schedule and retrying is the only defense. Each attempt carries its own
//! timeout so a hung connection cannot stall the schedule.

use crate::Result;
use anyhow::Context;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::warn;

/// Bounds each individual request attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the shared HTTP client with the per-request timeout applied.
pub(super) fn client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("Failed to build the HTTP client")
}

/// GETs `url`, retrying on transport errors and non-2xx statuses. `delays`
/// holds the wait before each retry, so `delays.len() + 1` attempts are made
/// in total; pass an empty slice for a single attempt. The final failure is
/// propagated to the caller.
pub(super) async fn get_with_retries(
    client: &Client,
    url: &str,
    headers: &HeaderMap,
    delays: &[Duration],
) -> Result<Response> {
    let mut attempt: usize = 0;
    loop {
        let result = client
            .get(url)
            .headers(headers.clone())
            .send()
            .await
            .and_then(Response::error_for_status);
        match result {
            Ok(response) => return Ok(response),
            Err(e) if attempt < delays.len() => {
                warn!("Attempt {} for GET {url} failed: {e}", attempt + 1);
                tokio::time::sleep(delays[attempt]).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("GET {url} failed after {} attempt(s)", attempt + 1)
                })
            }
        }
    }
}
