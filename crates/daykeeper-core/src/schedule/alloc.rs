//! Slot allocation engine: strict first-fit by slot order.

use serde::{Deserialize, Serialize};

use super::{Schedule, Task, SLOT_MINUTES};
use crate::error::{CoreError, Result, ValidationError};

/// Where a task landed after allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    pub slot_number: u8,
    pub time_range: String,
    pub task: Task,
}

/// Add a task to the first slot with enough remaining capacity.
///
/// No bin-packing, no best-fit: slots are scanned in slot-number order and
/// the first one with `remaining_minutes >= duration_minutes` wins. On
/// failure the schedule is left untouched. A duration over the fixed slot
/// capacity can never fit and fails without scanning.
pub fn add_task(schedule: &mut Schedule, name: &str, duration_minutes: u32) -> Result<Placement> {
    if duration_minutes == 0 {
        return Err(ValidationError::InvalidDuration {
            minutes: duration_minutes,
        }
        .into());
    }
    if duration_minutes > SLOT_MINUTES {
        return Err(CoreError::NoCapacity {
            requested: duration_minutes,
        });
    }

    let slot = schedule
        .slots
        .iter_mut()
        .find(|slot| slot.remaining_minutes >= duration_minutes)
        .ok_or(CoreError::NoCapacity {
            requested: duration_minutes,
        })?;

    let task = Task::new(name, duration_minutes);
    let placement = Placement {
        slot_number: slot.slot_number,
        time_range: slot.time_range_label(),
        task: task.clone(),
    };
    // Append and decrement together; no partial state is observable
    // before the caller persists.
    slot.tasks.push(task);
    slot.remaining_minutes -= duration_minutes;
    Ok(placement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::SLOT_COUNT;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn schedule() -> Schedule {
        Schedule::new(NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(), 7)
    }

    #[test]
    fn first_fit_skips_full_slots() {
        let mut schedule = schedule();
        schedule.slots[0].remaining_minutes = 50;
        schedule.slots[1].remaining_minutes = 200;
        schedule.slots[2].remaining_minutes = 240;
        schedule.slots[3].remaining_minutes = 0;

        let placement = add_task(&mut schedule, "Review", 60).unwrap();
        assert_eq!(placement.slot_number, 2);
        assert_eq!(schedule.slots[1].remaining_minutes, 140);
        assert_eq!(schedule.slots[2].remaining_minutes, 240);
    }

    #[test]
    fn zero_duration_is_rejected_before_search() {
        let mut schedule = schedule();
        let err = add_task(&mut schedule, "Nothing", 0).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidDuration { .. })
        ));
        assert!(schedule.slots.iter().all(|s| s.tasks.is_empty()));
    }

    #[test]
    fn over_capacity_duration_always_fails() {
        let mut schedule = schedule();
        let err = add_task(&mut schedule, "Marathon", 241).unwrap_err();
        assert!(matches!(err, CoreError::NoCapacity { requested: 241 }));
    }

    #[test]
    fn exact_fit_drains_the_slot() {
        let mut schedule = schedule();
        let placement = add_task(&mut schedule, "Block", 240).unwrap();
        assert_eq!(placement.slot_number, 1);
        assert_eq!(schedule.slots[0].remaining_minutes, 0);

        // Next task lands in slot 2.
        let placement = add_task(&mut schedule, "Next", 10).unwrap();
        assert_eq!(placement.slot_number, 2);
    }

    #[test]
    fn failed_allocation_leaves_schedule_untouched() {
        let mut schedule = schedule();
        for slot in &mut schedule.slots {
            slot.remaining_minutes = 30;
        }
        let before = schedule.clone();
        assert!(add_task(&mut schedule, "Too big", 31).is_err());
        assert_eq!(schedule, before);
    }

    proptest! {
        /// Capacity conservation: at every point, remaining minutes plus
        /// placed task durations account for the full day.
        #[test]
        fn capacity_is_conserved(durations in proptest::collection::vec(1u32..=300, 0..40)) {
            let mut schedule = schedule();
            for duration in durations {
                let _ = add_task(&mut schedule, "task", duration);

                let remaining: u32 = schedule.slots.iter().map(|s| s.remaining_minutes).sum();
                let placed: u32 = schedule
                    .slots
                    .iter()
                    .flat_map(|s| s.tasks.iter())
                    .map(|t| t.duration_minutes)
                    .sum();
                prop_assert_eq!(remaining + placed, SLOT_COUNT as u32 * SLOT_MINUTES);
                for slot in &schedule.slots {
                    prop_assert!(slot.remaining_minutes <= slot.total_minutes);
                }
            }
        }
    }
}
