//! Webhook notification for confirmed-available usernames.
//!
//! Delivery is strictly best-effort: the checker logs a failed send and
//! moves on. Notification never affects classification or counters.

use crate::error::CheckError;
use chrono::Utc;
use rand::Rng;

/// Sends a Discord-style embed to a configured webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Create a notifier for `url`.
    pub fn new<S: Into<String>>(url: S) -> Result<Self, CheckError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| {
                CheckError::network_with_source(
                    "Failed to create webhook HTTP client",
                    e.to_string(),
                )
            })?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// The configured webhook URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one embed announcing that `username` is available.
    pub async fn notify_available(&self, username: &str) -> Result<(), CheckError> {
        let payload = serde_json::json!({
            "username": "Username Checker",
            "embeds": [{
                "title": "Valid Username Found",
                "color": rand::thread_rng().gen_range(0..0xFFFFFF),
                "timestamp": Utc::now().to_rfc3339(),
                "fields": [{
                    "name": "Username",
                    "value": username,
                    "inline": true,
                }],
            }],
        });

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CheckError::notify(format!("Webhook request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::notify(format!(
                "Webhook returned status {}",
                status
            )));
        }

        Ok(())
    }
}
