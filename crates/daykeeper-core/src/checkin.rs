//! Interactive daily check-in session.
//!
//! The session itself is a plain state machine -- the platform adapter
//! dispatches answers into it rather than capturing state in UI callbacks.
//! [`CheckinRunner`] drives it end to end: sequential yes/no habit
//! questions, a bounded free-text journal wait, then summary generation
//! and posting.

use chrono::NaiveDate;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::UserConfig;
use crate::error::{CoreError, Result};
use crate::habits::{prompt_list, HabitAnswer, HabitPrompt, HabitRecord};
use crate::platform::{ChatPort, UserRef};
use crate::store::HabitStore;
use crate::summary::{JournalEntry, SummaryGenerator};

/// Inactivity bound for the habit-answer phase.
pub const HABIT_ANSWER_TIMEOUT: Duration = Duration::from_secs(300);

/// Bounded wait for the free-text journal entry.
pub const JOURNAL_WAIT_TIMEOUT: Duration = Duration::from_secs(600);

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckinPhase {
    /// Waiting on the yes/no answer for habit `index`.
    AwaitingHabitAnswer(usize),
    /// All habits answered; waiting on the free-text journal entry.
    AwaitingJournalText,
    /// Journal captured (or skipped); ready for summary generation.
    Finalizing,
    /// Timed out during the habit phase; nothing was saved.
    Abandoned,
}

/// One check-in attempt. Re-running the command builds a fresh session;
/// prior answers for the same day are overwritten on save, not merged.
#[derive(Debug, Clone)]
pub struct CheckinSession {
    date: NaiveDate,
    prompts: Vec<HabitPrompt>,
    answers: Vec<HabitAnswer>,
    journal_text: Option<String>,
    phase: CheckinPhase,
}

impl CheckinSession {
    /// Build the ordered question list. Fails before any message is sent
    /// when no habits are configured.
    pub fn new(config: &UserConfig, date: NaiveDate) -> Result<Self> {
        let prompts = prompt_list(config);
        if prompts.is_empty() {
            return Err(CoreError::NoHabitsConfigured);
        }
        Ok(Self {
            date,
            prompts,
            answers: Vec::new(),
            journal_text: None,
            phase: CheckinPhase::AwaitingHabitAnswer(0),
        })
    }

    pub fn phase(&self) -> CheckinPhase {
        self.phase
    }

    pub fn question_count(&self) -> usize {
        self.prompts.len()
    }

    /// Question text for the current habit, if the session is in the
    /// habit-answer phase.
    pub fn question_text(&self) -> Option<String> {
        match self.phase {
            CheckinPhase::AwaitingHabitAnswer(index) => self
                .prompts
                .get(index)
                .map(|prompt| prompt.question_text(index, self.prompts.len())),
            _ => None,
        }
    }

    /// Record the answer for the current habit and advance.
    pub fn on_answer(&mut self, answered_yes: bool) {
        let CheckinPhase::AwaitingHabitAnswer(index) = self.phase else {
            return;
        };
        let Some(prompt) = self.prompts.get(index) else {
            return;
        };
        self.answers.push(HabitAnswer {
            habit: prompt.habit.clone(),
            polarity: prompt.polarity,
            answered_yes,
        });
        self.phase = if index + 1 < self.prompts.len() {
            CheckinPhase::AwaitingHabitAnswer(index + 1)
        } else {
            CheckinPhase::AwaitingJournalText
        };
    }

    /// Capture the journal text (or its absence) and finalize.
    pub fn on_journal(&mut self, text: Option<String>) {
        if self.phase == CheckinPhase::AwaitingJournalText {
            self.journal_text = text;
            self.phase = CheckinPhase::Finalizing;
        }
    }

    /// Handle an inactivity timeout for the current phase.
    ///
    /// In the habit phase the session is abandoned outright; a missing
    /// journal entry is a normal outcome, not a failure.
    pub fn on_timeout(&mut self) {
        match self.phase {
            CheckinPhase::AwaitingHabitAnswer(_) => self.phase = CheckinPhase::Abandoned,
            CheckinPhase::AwaitingJournalText => self.on_journal(None),
            _ => {}
        }
    }

    pub fn journal_text(&self) -> Option<&str> {
        self.journal_text.as_deref()
    }

    /// Snapshot of the answers recorded so far.
    pub fn record(&self) -> HabitRecord {
        HabitRecord {
            date: self.date,
            answers: self.answers.clone(),
        }
    }
}

/// How a driven check-in ended.
#[derive(Debug)]
pub enum CheckinOutcome {
    Completed {
        entry: JournalEntry,
        /// Whether the entry reached the journal channel.
        posted: bool,
    },
    /// Habit phase timed out; nothing was saved and no summary was made.
    TimedOut,
}

/// Drives a [`CheckinSession`] against the chat port and stores.
pub struct CheckinRunner<'a> {
    pub port: &'a dyn ChatPort,
    pub habits: &'a HabitStore,
    pub generator: &'a SummaryGenerator,
}

impl CheckinRunner<'_> {
    pub async fn run(
        &self,
        user: &UserRef,
        config: &UserConfig,
        date: NaiveDate,
    ) -> Result<CheckinOutcome> {
        let mut session = CheckinSession::new(config, date)?;
        info!(user = %user.id, %date, questions = session.question_count(), "check-in started");

        while let CheckinPhase::AwaitingHabitAnswer(_) = session.phase() {
            let Some(question) = session.question_text() else {
                break;
            };
            match timeout(HABIT_ANSWER_TIMEOUT, self.port.ask_yes_no(user, &question)).await {
                Ok(Ok(answered_yes)) => session.on_answer(answered_yes),
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => {
                    session.on_timeout();
                    if let Err(e) = self
                        .port
                        .send_dm(user, "Your check-in timed out. Run checkin to try again.")
                        .await
                    {
                        warn!(user = %user.id, error = %e, "timeout notice delivery failed");
                    }
                    return Ok(CheckinOutcome::TimedOut);
                }
            }
        }

        // All habits answered: persist before prompting for the journal.
        self.habits.save(user.id, &session.record()).await?;
        self.port
            .send_dm(
                user,
                "✅ **Check-in complete!** All habits recorded.\n\n\
                 **How was your day overall?**\n\
                 Write your journal entry below. I'll wait for 10 minutes.",
            )
            .await?;

        let journal_text = match timeout(JOURNAL_WAIT_TIMEOUT, self.port.wait_for_reply(user)).await
        {
            Ok(Ok(text)) => {
                if let Err(e) = self
                    .port
                    .send_dm(user, "Journal entry received! Generating your daily summary...")
                    .await
                {
                    warn!(user = %user.id, error = %e, "ack delivery failed");
                }
                Some(text)
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                // Normal outcome: habits stay saved, summary has no entry.
                if let Err(e) = self
                    .port
                    .send_dm(
                        user,
                        "Looks like you got busy. I'll skip the journal entry for today, \
                         but your habits are saved!",
                    )
                    .await
                {
                    warn!(user = %user.id, error = %e, "skip notice delivery failed");
                }
                None
            }
        };
        session.on_journal(journal_text.clone());

        let entry = self.generator.generate(user, &session.record(), journal_text);
        let posted = match self.port.post_journal(config.journal_channel, &entry).await {
            Ok(()) => true,
            Err(e) => {
                warn!(user = %user.id, channel = %config.journal_channel, error = %e, "journal post failed");
                if let Err(e) = self
                    .port
                    .send_dm(
                        user,
                        &format!("I failed to post your summary to the journal channel: {e}"),
                    )
                    .await
                {
                    warn!(user = %user.id, error = %e, "post-failure notice delivery failed");
                }
                false
            }
        };
        Ok(CheckinOutcome::Completed { entry, posted })
    }
}
