//! High-level assistant facade.
//!
//! [`Daykeeper`] owns the typed stores, the reminder scheduler, and the
//! chat port, and exposes one method per user-facing operation. Command
//! handlers (CLI, bot adapters) call into this and render the result;
//! they hold no domain logic of their own.
//!
//! Schedule mutations are read-modify-write under a revision guard. On a
//! [`StoreError::RevisionConflict`] the whole mutation is replayed against
//! the fresh document, up to a small bounded number of attempts.

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::checkin::{CheckinOutcome, CheckinRunner};
use crate::config::{parse_habit_lines, UserConfig};
use crate::error::{CoreError, Result, StoreError, ValidationError};
use crate::notify::{ReminderScheduler, TimerKey};
use crate::platform::{ChannelId, ChatPort, UserRef};
use crate::schedule::alloc::{add_task, Placement};
use crate::schedule::{lifecycle, ReflectionInput, Schedule, Task, TaskId, TaskStatus};
use crate::store::{ConfigStore, DocumentStore, HabitStore, ScheduleStore};
use crate::summary::SummaryGenerator;

/// Attempts for a guarded schedule write before giving up.
const WRITE_ATTEMPTS: u32 = 3;

/// Raw setup-form input, before validation.
#[derive(Debug, Clone)]
pub struct SetupInput {
    pub start_hour: u32,
    pub journal_channel: ChannelId,
    /// One habit per line; blanks are dropped.
    pub positive_habits: String,
    /// One habit per line; blanks are dropped.
    pub negative_habits: String,
}

/// The assistant service: one instance per process.
pub struct Daykeeper {
    configs: ConfigStore,
    schedules: ScheduleStore,
    habits: HabitStore,
    reminders: ReminderScheduler,
    port: Arc<dyn ChatPort>,
    generator: SummaryGenerator,
}

impl Daykeeper {
    pub fn new(store: Arc<dyn DocumentStore>, port: Arc<dyn ChatPort>) -> Self {
        Self {
            configs: ConfigStore::new(Arc::clone(&store)),
            schedules: ScheduleStore::new(Arc::clone(&store)),
            habits: HabitStore::new(store),
            reminders: ReminderScheduler::new(Arc::clone(&port)),
            port,
            generator: SummaryGenerator::new(),
        }
    }

    /// Validate and persist a user's setup. A re-run replaces the previous
    /// config wholesale; existing schedules and habit records are untouched.
    pub async fn setup(&self, user: &UserRef, input: SetupInput) -> Result<UserConfig> {
        let config = UserConfig::new(
            input.start_hour,
            input.journal_channel,
            parse_habit_lines(&input.positive_habits),
            parse_habit_lines(&input.negative_habits),
        )?;
        self.configs.save(user.id, &config).await?;
        info!(user = %user.id, start_hour = config.start_hour, habits = config.habit_count(), "setup saved");
        Ok(config)
    }

    async fn require_config(&self, user: &UserRef) -> Result<UserConfig> {
        self.configs
            .load(user.id)
            .await?
            .ok_or(CoreError::NotConfigured)
    }

    /// Today's schedule, created on first access.
    pub async fn schedule_view(&self, user: &UserRef, date: NaiveDate) -> Result<Schedule> {
        let config = self.require_config(user).await?;
        let (schedule, _) = self
            .schedules
            .get_or_create(user.id, date, config.start_hour)
            .await?;
        Ok(schedule)
    }

    /// Place a task into the first slot with room and persist the result.
    pub async fn add_task(
        &self,
        user: &UserRef,
        date: NaiveDate,
        name: &str,
        duration_minutes: u32,
    ) -> Result<Placement> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField { field: "task name" }.into());
        }
        let config = self.require_config(user).await?;

        let mut last_conflict = None;
        for attempt in 0..WRITE_ATTEMPTS {
            let (mut schedule, revision) = self
                .schedules
                .get_or_create(user.id, date, config.start_hour)
                .await?;
            let placement = add_task(&mut schedule, name, duration_minutes)?;
            match self.schedules.save(user.id, &schedule, revision).await {
                Ok(_) => {
                    info!(
                        user = %user.id,
                        task = %placement.task.id,
                        slot = placement.slot_number,
                        "task added"
                    );
                    return Ok(placement);
                }
                Err(CoreError::Store(e @ StoreError::RevisionConflict { .. })) => {
                    debug!(user = %user.id, attempt, "schedule write conflicted, replaying");
                    last_conflict = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_conflict
            .map(CoreError::Store)
            .unwrap_or(CoreError::NoCapacity {
                requested: duration_minutes,
            }))
    }

    /// Tasks eligible for `start_task` / `complete_task`, in slot order.
    pub async fn open_tasks(&self, user: &UserRef, date: NaiveDate) -> Result<Vec<Task>> {
        let schedule = self.schedule_view(user, date).await?;
        Ok(schedule
            .tasks_with_status(&[TaskStatus::Pending, TaskStatus::InProgress])
            .into_iter()
            .cloned()
            .collect())
    }

    /// Mark a task in progress and arm its end-of-duration reminder.
    ///
    /// Restarting an in-progress task resets the reminder; the previous
    /// timer is cancelled, not stacked.
    pub async fn start_task(&self, user: &UserRef, date: NaiveDate, id: TaskId) -> Result<Task> {
        let config = self.require_config(user).await?;

        let mut last_conflict = None;
        for attempt in 0..WRITE_ATTEMPTS {
            let (mut schedule, revision) = self
                .schedules
                .get_or_create(user.id, date, config.start_hour)
                .await?;
            let task = lifecycle::start(&mut schedule, id)?.clone();
            match self.schedules.save(user.id, &schedule, revision).await {
                Ok(_) => {
                    let key = TimerKey {
                        user: user.id,
                        task: task.id,
                    };
                    self.reminders.arm(
                        key,
                        user.clone(),
                        task.name.clone(),
                        Duration::from_secs(u64::from(task.duration_minutes) * 60),
                    );
                    info!(user = %user.id, task = %task.id, minutes = task.duration_minutes, "task started");
                    return Ok(task);
                }
                Err(CoreError::Store(e @ StoreError::RevisionConflict { .. })) => {
                    debug!(user = %user.id, attempt, "schedule write conflicted, replaying");
                    last_conflict = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_conflict
            .map(CoreError::Store)
            .unwrap_or(CoreError::TaskNotFound { id }))
    }

    /// Mark a task completed with its reflection and drop any pending
    /// reminder for it.
    pub async fn complete_task(
        &self,
        user: &UserRef,
        date: NaiveDate,
        id: TaskId,
        reflection: ReflectionInput,
    ) -> Result<Task> {
        let config = self.require_config(user).await?;

        // Cancel before persisting: a reminder for a finished task must not
        // fire even if the write below fails and the user retries.
        self.reminders.cancel(&TimerKey {
            user: user.id,
            task: id,
        });

        let mut last_conflict = None;
        for attempt in 0..WRITE_ATTEMPTS {
            let (mut schedule, revision) = self
                .schedules
                .get_or_create(user.id, date, config.start_hour)
                .await?;
            let task = lifecycle::complete(&mut schedule, id, reflection.clone())?.clone();
            match self.schedules.save(user.id, &schedule, revision).await {
                Ok(_) => {
                    info!(user = %user.id, task = %task.id, "task completed");
                    return Ok(task);
                }
                Err(CoreError::Store(e @ StoreError::RevisionConflict { .. })) => {
                    debug!(user = %user.id, attempt, "schedule write conflicted, replaying");
                    last_conflict = Some(e);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_conflict
            .map(CoreError::Store)
            .unwrap_or(CoreError::TaskNotFound { id }))
    }

    /// Run the interactive check-in for `date`.
    pub async fn check_in(&self, user: &UserRef, date: NaiveDate) -> Result<CheckinOutcome> {
        let config = self.require_config(user).await?;
        let runner = CheckinRunner {
            port: self.port.as_ref(),
            habits: &self.habits,
            generator: &self.generator,
        };
        runner.run(user, &config, date).await
    }

    /// Pending reminder count, for diagnostics.
    pub fn active_reminders(&self) -> usize {
        self.reminders.active_count()
    }
}
