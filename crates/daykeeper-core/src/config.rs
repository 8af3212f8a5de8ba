//! Per-user configuration created by the setup command.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::platform::ChannelId;

/// A user's setup: day anchor, journal destination, and tracked habits.
///
/// Written as a full overwrite each time setup runs; there is no partial
/// update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Hour (0-23) the first slot of the day starts at.
    pub start_hour: u8,
    /// Channel the generated journal entries are posted to.
    pub journal_channel: ChannelId,
    /// Habits to do, in declared order.
    pub positive_habits: Vec<String>,
    /// Habits to avoid, in declared order.
    pub negative_habits: Vec<String>,
}

impl UserConfig {
    /// Build a validated config.
    pub fn new(
        start_hour: u32,
        journal_channel: ChannelId,
        positive_habits: Vec<String>,
        negative_habits: Vec<String>,
    ) -> Result<Self, ValidationError> {
        if start_hour > 23 {
            return Err(ValidationError::InvalidHour { value: start_hour });
        }
        Ok(Self {
            start_hour: start_hour as u8,
            journal_channel,
            positive_habits,
            negative_habits,
        })
    }

    pub fn habit_count(&self) -> usize {
        self.positive_habits.len() + self.negative_habits.len()
    }
}

/// Split newline-separated habit text into a clean list.
///
/// Lines are trimmed and empties dropped, matching how the setup form
/// collects one habit per line.
pub fn parse_habit_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
