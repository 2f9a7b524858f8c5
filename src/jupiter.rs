//! HTTP client for the Jupiter swap API (`/quote` and `/swap`).
//!
//! Requests go to the configured hostname with reqwest's default
//! certificate validation. Every request shares one total timeout.

use reqwest::{Client, Response, Url};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct JupiterClient {
    pub(crate) http: Client,
    base_url: Url,
}

impl JupiterClient {
    pub fn new(base_url: Url, timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base_url })
    }

    // `{base}/{endpoint}`, tolerating a trailing slash on the base
    pub(crate) fn endpoint(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), endpoint)
    }
}

/// Turn a non-2xx response into `"<status>: <body>"` for diagnostics.
pub(crate) async fn error_for_status(response: Response) -> Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to get error details".to_string());
    Err(format!("status {}: {}", status, body.trim()))
}
