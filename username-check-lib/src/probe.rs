//! Availability probe against the remote username API.
//!
//! One probe is one full retrying attempt sequence for a single name:
//! up to `max_attempts` sequential HTTP POSTs, optionally through a proxy
//! selected once for the whole probe, classified into a tri-state
//! [`Outcome`]. Transport failures, non-200 statuses, and undecodable
//! bodies advance to the next attempt; the first decodable response ends
//! the loop whatever it says.

use crate::error::CheckError;
use crate::types::Outcome;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The fixed availability endpoint.
pub const USERNAME_CHECK_API: &str =
    "https://discord.com/api/v9/unique-username/username-attempt-unauthed";

/// The fixed User-Agent sent with every attempt.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

/// Request body for a username check.
#[derive(Debug, Serialize)]
pub struct UsernameRequest<'a> {
    pub username: &'a str,
}

/// Response body for a username check.
#[derive(Debug, Deserialize)]
pub struct UsernameResponse {
    pub taken: bool,
}

/// Probe client holding the per-attempt policy for a run.
///
/// The HTTP client itself is rebuilt per attempt: proxy selection is
/// per-probe, and a malformed proxy URI must surface as an attempt
/// failure rather than a constructor error.
#[derive(Debug, Clone)]
pub struct ProbeClient {
    endpoint: String,
    timeout: Duration,
    max_attempts: u32,
}

impl ProbeClient {
    /// Create a probe client for the fixed production endpoint.
    pub fn new(timeout: Duration, max_attempts: u32) -> Self {
        Self {
            endpoint: USERNAME_CHECK_API.to_string(),
            timeout,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Create a probe client aimed at a custom endpoint (used by tests).
    pub fn with_endpoint<S: Into<String>>(
        endpoint: S,
        timeout: Duration,
        max_attempts: u32,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
            max_attempts: max_attempts.max(1),
        }
    }

    /// The endpoint this client probes.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute one probe for `username`, returning the classification and
    /// the number of HTTP attempts actually made.
    ///
    /// If `proxy` is `Some`, every attempt within this probe goes through
    /// that same proxy. Exhausting the attempt budget yields
    /// [`Outcome::ProbeFailed`]; callers must treat that identically to
    /// [`Outcome::Taken`].
    pub async fn probe(&self, username: &str, proxy: Option<&str>) -> (Outcome, u32) {
        // The body is identical across attempts, so marshal it once; a
        // marshaling failure cannot be retried away.
        let body = match serde_json::to_vec(&UsernameRequest { username }) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(username, error = %e, "failed to marshal request body");
                return (Outcome::ProbeFailed, 0);
            }
        };

        let max_attempts = self.max_attempts;

        for attempt in 1..=max_attempts {
            match self.attempt(username, proxy, body.clone()).await {
                Ok(taken) => {
                    let outcome = if taken {
                        Outcome::Taken
                    } else {
                        Outcome::Available
                    };
                    return (outcome, attempt);
                }
                Err(e) => {
                    tracing::warn!(
                        username,
                        attempt,
                        max_attempts,
                        error = %e,
                        "probe attempt failed"
                    );
                    if attempt < max_attempts {
                        tracing::debug!(username, next_attempt = attempt + 1, "retrying");
                    }
                }
            }
        }

        (Outcome::ProbeFailed, max_attempts)
    }

    /// One HTTP attempt: build a client (with the probe's proxy, if any),
    /// POST the body, and decode the `taken` flag.
    async fn attempt(
        &self,
        username: &str,
        proxy: Option<&str>,
        body: Vec<u8>,
    ) -> Result<bool, CheckError> {
        let mut builder = reqwest::Client::builder().timeout(self.timeout);

        if let Some(proxy_uri) = proxy {
            let proxy = reqwest::Proxy::all(proxy_uri).map_err(|e| {
                CheckError::network_with_source(
                    format!("Invalid proxy URI '{}'", proxy_uri),
                    e.to_string(),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            CheckError::network_with_source("Failed to build HTTP client", e.to_string())
        })?;

        let response = client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .body(body)
            .send()
            .await
            .map_err(|e| CheckError::api(username, format!("Request failed: {}", e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CheckError::api_with_status(
                username,
                format!("API returned status {}", status),
                status.as_u16(),
            ));
        }

        let decoded = response
            .json::<UsernameResponse>()
            .await
            .map_err(|e| CheckError::api(username, format!("Failed to decode response: {}", e)))?;

        Ok(decoded.taken)
    }
}
