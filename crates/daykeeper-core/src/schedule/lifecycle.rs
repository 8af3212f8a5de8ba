//! Task lifecycle transitions: pending → in_progress → completed.

use chrono::Utc;

use super::{Reflection, ReflectionInput, Schedule, Task, TaskId, TaskStatus};
use crate::error::{CoreError, Result};

/// Mark a task in progress.
///
/// Starting an already-in-progress task is allowed; the caller re-arms its
/// reminder timer. Starting a completed task is rejected -- reverting a
/// finished task would desync the reminder and its reflection.
pub fn start(schedule: &mut Schedule, id: TaskId) -> Result<&Task> {
    let task = schedule
        .find_task_mut(id)
        .ok_or(CoreError::TaskNotFound { id })?;
    if task.status == TaskStatus::Completed {
        return Err(CoreError::TaskCompleted { id });
    }
    task.status = TaskStatus::InProgress;
    Ok(task)
}

/// Mark a task completed and attach its reflection.
///
/// Valid from pending or in_progress. Completing an already-completed task
/// overwrites the reflection; that matches the original behavior and is
/// kept deliberately. The timestamp is assigned here, not by the caller.
pub fn complete(schedule: &mut Schedule, id: TaskId, input: ReflectionInput) -> Result<&Task> {
    let task = schedule
        .find_task_mut(id)
        .ok_or(CoreError::TaskNotFound { id })?;
    task.status = TaskStatus::Completed;
    task.reflection = Some(Reflection {
        difficulties: input.difficulties,
        interruptions: input.interruptions,
        feelings: input.feelings,
        recorded_at: Utc::now(),
    });
    Ok(task)
}
