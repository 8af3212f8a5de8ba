//! # Daykeeper Core Library
//!
//! Core business logic for the Daykeeper personal productivity assistant.
//! All operations are available through a platform-neutral service facade;
//! chat adapters (the CLI console, bot frontends) are thin layers over the
//! same core library.
//!
//! ## Architecture
//!
//! - **Schedule**: Four fixed 240-minute slots per day with strict
//!   first-fit task allocation and a pending → in-progress → completed
//!   task lifecycle
//! - **Check-in**: An interactive habit review session driven as a plain
//!   state machine, followed by a bounded journal-entry wait
//! - **Summary**: Adherence scoring, narrative tier classification, and
//!   journal entry generation
//! - **Storage**: SQLite-backed JSON document store with revision-guarded
//!   writes
//! - **Notify**: In-memory one-shot reminder timers, one per (user, task)
//!
//! ## Key Components
//!
//! - [`Daykeeper`]: The service facade, one method per user operation
//! - [`ChatPort`]: Contract a chat platform adapter implements
//! - [`Schedule`]: A user's slotted day
//! - [`CheckinSession`]: The habit check-in state machine
//! - [`SummaryGenerator`]: Daily journal entry builder

pub mod checkin;
pub mod config;
pub mod error;
pub mod habits;
pub mod notify;
pub mod platform;
pub mod schedule;
pub mod service;
pub mod store;
pub mod summary;

pub use checkin::{CheckinOutcome, CheckinPhase, CheckinRunner, CheckinSession};
pub use config::UserConfig;
pub use error::{CoreError, DeliveryError, StoreError, ValidationError};
pub use habits::{HabitAnswer, HabitPolarity, HabitPrompt, HabitRecord};
pub use notify::{ReminderScheduler, TimerKey};
pub use platform::{ChannelId, ChatPort, UserId, UserRef};
pub use schedule::{Schedule, Slot, Task, TaskId, TaskStatus};
pub use service::{Daykeeper, SetupInput};
pub use store::{DocumentStore, SqliteStore};
pub use summary::{DayScore, JournalEntry, SummaryGenerator, Tier};
