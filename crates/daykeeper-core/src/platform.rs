//! Chat-platform port traits and identity types.
//!
//! The platform connection itself (gateway, command registration, message
//! rendering) lives outside this crate. Core code talks to it through the
//! narrow [`ChatPort`] contract; adapters only need to implement this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DeliveryError;
use crate::summary::JournalEntry;

/// Stable platform user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Channel id/handle as resolved by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user as the platform presents them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Chat platform adapter contract.
///
/// All waits are unbounded from the port's point of view; callers bound
/// them with `tokio::time::timeout` where the protocol requires it.
#[async_trait]
pub trait ChatPort: Send + Sync {
    /// Deliver a private message to the user.
    async fn send_dm(&self, user: &UserRef, text: &str) -> Result<(), DeliveryError>;

    /// Present a binary yes/no choice and wait for the pick.
    async fn ask_yes_no(&self, user: &UserRef, question: &str) -> Result<bool, DeliveryError>;

    /// Wait for the next free-text message from the user in their
    /// private channel.
    async fn wait_for_reply(&self, user: &UserRef) -> Result<String, DeliveryError>;

    /// Deliver a journal entry to the named channel.
    async fn post_journal(
        &self,
        channel: ChannelId,
        entry: &JournalEntry,
    ) -> Result<(), DeliveryError>;
}
