//! Chat webhook sink (Slack-compatible `{"text": ...}` payload).

use std::time::Duration;

use async_trait::async_trait;

use super::{NotificationError, NotificationSink};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

/// Posts the summary to an incoming-webhook URL. One attempt, no retry.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn post(&self, summary: &str) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "text": summary }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, summary: &str) -> Result<(), NotificationError> {
        self.post(summary).await?;
        tracing::info!(sink = self.name(), "Webhook notification sent");
        Ok(())
    }
}
