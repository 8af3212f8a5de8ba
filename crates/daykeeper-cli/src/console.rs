//! Console chat adapter.
//!
//! Implements the core `ChatPort` over stdin/stdout so every interactive
//! flow (check-in questions, reminders) works in a plain terminal. Journal
//! entries go to the configured webhook when one is set, otherwise they
//! are printed.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

use daykeeper_core::error::DeliveryError;
use daykeeper_core::platform::{ChannelId, ChatPort, UserRef};
use daykeeper_core::summary::JournalEntry;

use crate::webhook::WebhookPoster;

pub struct ConsolePort {
    input: Mutex<BufReader<Stdin>>,
    webhook: Option<WebhookPoster>,
}

impl ConsolePort {
    pub fn new(webhook: Option<WebhookPoster>) -> Self {
        Self {
            input: Mutex::new(BufReader::new(tokio::io::stdin())),
            webhook,
        }
    }

    async fn read_line(&self) -> Result<String, DeliveryError> {
        let mut input = self.input.lock().await;
        let mut line = String::new();
        let n = input
            .read_line(&mut line)
            .await
            .map_err(|e| DeliveryError::new(format!("stdin read failed: {e}")))?;
        if n == 0 {
            return Err(DeliveryError::new("stdin closed"));
        }
        Ok(line.trim().to_string())
    }
}

/// Interpret a console answer as yes/no. `None` means unrecognized.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

#[async_trait]
impl ChatPort for ConsolePort {
    async fn send_dm(&self, _user: &UserRef, text: &str) -> Result<(), DeliveryError> {
        println!("{text}");
        Ok(())
    }

    async fn ask_yes_no(&self, _user: &UserRef, question: &str) -> Result<bool, DeliveryError> {
        println!("{question}");
        loop {
            println!("[y/n]");
            let line = self.read_line().await?;
            if let Some(answer) = parse_yes_no(&line) {
                return Ok(answer);
            }
            println!("Please answer 'y' or 'n'.");
        }
    }

    async fn wait_for_reply(&self, _user: &UserRef) -> Result<String, DeliveryError> {
        self.read_line().await
    }

    async fn post_journal(
        &self,
        _channel: ChannelId,
        entry: &JournalEntry,
    ) -> Result<(), DeliveryError> {
        match &self.webhook {
            Some(webhook) => webhook.post(entry).await,
            None => {
                println!("{}", entry.render_text());
                Ok(())
            }
        }
    }
}
