//! Webhook delivery for journal entries.
//!
//! Posts Discord-compatible embed payloads. Any endpoint accepting the
//! same shape works; a 2xx or 204 response counts as delivered.

use reqwest::Client;
use serde_json::json;

use daykeeper_core::error::DeliveryError;
use daykeeper_core::summary::JournalEntry;

pub struct WebhookPoster {
    client: Client,
    url: String,
}

impl WebhookPoster {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Deliver a journal entry as a rich embed.
    pub async fn post(&self, entry: &JournalEntry) -> Result<(), DeliveryError> {
        let body = json!({
            "embeds": [{
                "title": entry.title,
                "description": format!("{}\n\n{}", entry.status_line, entry.narrative),
                "color": 0x58B9FF,
                "fields": [
                    {
                        "name": "Habit Scoreboard",
                        "value": entry.scoreboard_text(),
                        "inline": false,
                    },
                    {
                        "name": "Journal Entry",
                        "value": entry.journal_text_or_placeholder(),
                        "inline": false,
                    },
                ],
                "author": {
                    "name": entry.author.name,
                    "icon_url": entry.author.avatar_url,
                },
                "footer": { "text": format!("Daily summary for {}", entry.date) },
            }],
        });

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryError::new(format!("webhook request failed: {e}")))?;

        if resp.status().is_success() || resp.status().as_u16() == 204 {
            Ok(())
        } else {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            Err(DeliveryError::new(format!(
                "webhook error (HTTP {status}): {text}"
            )))
        }
    }
}
