// crates/server/src/notify.rs
//! Push-notification client for the "just smoked" message.
//!
//! Sends a small JSON payload to a user-configured webhook whenever a
//! single event is logged. Delivery is strictly best-effort: callers log
//! a failure and carry on, the primary write is never rolled back.

use chrono::{DateTime, Datelike, Timelike, Utc};
use thiserror::Error;

use kemuri_core::jst::to_jst;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Webhook returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Webhook notification client.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl Notifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
        }
    }

    /// Post the smoked-at message for the given instant.
    pub async fn send_smoked(&self, smoked_at: DateTime<Utc>) -> Result<(), NotifyError> {
        self.send(&smoked_message(smoked_at)).await
    }

    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status()));
        }
        Ok(())
    }
}

/// Notification text, rendered with JST wall-clock fields.
fn smoked_message(smoked_at: DateTime<Utc>) -> String {
    let jst = to_jst(smoked_at);
    format!(
        "{}月{}日{}時{}分に吸ったよ！",
        jst.month(),
        jst.day(),
        jst.hour(),
        jst.minute()
    )
}
