//! Daily schedule data model: four fixed 240-minute slots holding tasks.
//!
//! A schedule exists per user per calendar date and is created lazily on
//! first access that day. Slots partition the day starting at the user's
//! chosen anchor hour, advancing 4 hours (mod 24) per slot. Tasks are
//! appended by the allocation engine and never removed; `remaining_minutes`
//! is decremented exactly once at add-time and never recomputed.

pub mod alloc;
pub mod lifecycle;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of slots partitioning a day.
pub const SLOT_COUNT: u8 = 4;

/// Fixed capacity of every slot, in minutes.
pub const SLOT_MINUTES: u32 = 240;

/// Globally unique task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Task status.
///
/// Valid transitions:
/// - pending → in_progress (start)
/// - pending → completed (done without a timer)
/// - in_progress → in_progress (restart; re-arms the reminder)
/// - in_progress → completed (done)
/// - completed is terminal for `start`; `complete` may re-run and
///   overwrites the reflection (preserved behavior of the original).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Short display marker for schedule rendering.
    pub fn marker(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "[ ]",
            TaskStatus::InProgress => "[>]",
            TaskStatus::Completed => "[x]",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// Reflection captured when a task is completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    pub difficulties: String,
    pub interruptions: String,
    pub feelings: String,
    /// Assigned by the system clock at completion.
    pub recorded_at: DateTime<Utc>,
}

/// Caller-supplied reflection fields; the timestamp is server-assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReflectionInput {
    pub difficulties: String,
    pub interruptions: String,
    pub feelings: String,
}

/// A task placed in a slot. Owned exclusively by its containing slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub duration_minutes: u32,
    pub status: TaskStatus,
    #[serde(default)]
    pub reflection: Option<Reflection>,
}

impl Task {
    /// Create a pending task with a fresh id.
    pub fn new(name: impl Into<String>, duration_minutes: u32) -> Self {
        Self {
            id: TaskId::new(),
            name: name.into(),
            duration_minutes,
            status: TaskStatus::Pending,
            reflection: None,
        }
    }
}

/// One of four fixed 240-minute windows of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// 1-based slot number.
    pub slot_number: u8,
    /// Hour (0-23) this slot starts at.
    pub start_hour: u8,
    pub total_minutes: u32,
    pub remaining_minutes: u32,
    pub tasks: Vec<Task>,
}

impl Slot {
    /// "HH:00 - HH:00" label for the slot's window.
    pub fn time_range_label(&self) -> String {
        let end_hour = (self.start_hour + 4) % 24;
        format!("{:02}:00 - {:02}:00", self.start_hour, end_hour)
    }
}

/// A user's schedule for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
}

impl Schedule {
    /// Build a fresh schedule: four empty slots anchored at `start_hour`,
    /// each advancing 4 hours mod 24.
    pub fn new(date: NaiveDate, start_hour: u8) -> Self {
        let mut slots = Vec::with_capacity(SLOT_COUNT as usize);
        let mut hour = start_hour % 24;
        for number in 1..=SLOT_COUNT {
            slots.push(Slot {
                slot_number: number,
                start_hour: hour,
                total_minutes: SLOT_MINUTES,
                remaining_minutes: SLOT_MINUTES,
                tasks: Vec::new(),
            });
            hour = (hour + 4) % 24;
        }
        Self { date, slots }
    }

    /// Locate a task by id across all slots. O(total tasks).
    pub fn find_task(&self, id: TaskId) -> Option<&Task> {
        self.slots
            .iter()
            .flat_map(|slot| slot.tasks.iter())
            .find(|task| task.id == id)
    }

    pub fn find_task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.slots
            .iter_mut()
            .flat_map(|slot| slot.tasks.iter_mut())
            .find(|task| task.id == id)
    }

    /// Tasks matching any of the given statuses, in slot order.
    pub fn tasks_with_status(&self, statuses: &[TaskStatus]) -> Vec<&Task> {
        self.slots
            .iter()
            .flat_map(|slot| slot.tasks.iter())
            .filter(|task| statuses.contains(&task.status))
            .collect()
    }

    /// Plain-text rendering of the schedule for display.
    pub fn render(&self) -> String {
        let mut out = format!("Today's Schedule ({})\n", self.date);
        for slot in &self.slots {
            out.push_str(&format!(
                "\nSlot {} ({})\n",
                slot.slot_number,
                slot.time_range_label()
            ));
            if slot.tasks.is_empty() {
                out.push_str("  (empty)\n");
            } else {
                for task in &slot.tasks {
                    out.push_str(&format!(
                        "  {} {} ({}m)\n",
                        task.status.marker(),
                        task.name,
                        task.duration_minutes
                    ));
                }
            }
            out.push_str(&format!("  remaining: {}m\n", slot.remaining_minutes));
        }
        out
    }
}
