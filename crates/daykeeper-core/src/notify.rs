//! Reminder timer subsystem.
//!
//! One pending reminder per (user, task), held in an owned registry --
//! no ambient global state. Timers are purely in-memory: a process restart
//! drops every pending reminder, a documented limitation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::platform::{ChatPort, UserId, UserRef};
use crate::schedule::TaskId;

/// Registry key: task id, not task name. Two tasks may share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerKey {
    pub user: UserId,
    pub task: TaskId,
}

/// A registered timer. The generation ties a spawned timer task to its
/// own map entry, so a fired timer cannot evict a replacement that was
/// armed while it was finishing.
struct TimerEntry {
    generation: u64,
    handle: JoinHandle<()>,
}

type TimerMap = HashMap<TimerKey, TimerEntry>;

/// Drop the registration for `key` only if it still belongs to the timer
/// identified by `generation`.
fn release_if_current(timers: &Mutex<TimerMap>, key: &TimerKey, generation: u64) {
    let mut timers = timers.lock().unwrap_or_else(|e| e.into_inner());
    if timers
        .get(key)
        .is_some_and(|entry| entry.generation == generation)
    {
        timers.remove(key);
    }
}

/// Owns all pending reminder timers and the port they deliver through.
pub struct ReminderScheduler {
    port: Arc<dyn ChatPort>,
    timers: Arc<Mutex<TimerMap>>,
    generation: AtomicU64,
}

impl ReminderScheduler {
    pub fn new(port: Arc<dyn ChatPort>) -> Self {
        Self {
            port,
            timers: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    /// Schedule a one-shot reminder DM after `delay`, measured from this
    /// call, not from when the spawned timer task first runs.
    ///
    /// Re-arming the same key cancels the existing timer first; there is
    /// no stacking and no duplicate notification. Delivery failure is
    /// logged and swallowed, and the key is released either way once the
    /// timer fires.
    pub fn arm(&self, key: TimerKey, user: UserRef, task_name: String, delay: Duration) {
        let port = Arc::clone(&self.port);
        let timers = Arc::clone(&self.timers);
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let deadline = tokio::time::Instant::now() + delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let text = format!(
                "🔔 **Time's up!** Your task **'{task_name}'** is due to end.\n\n\
                 Don't forget to mark it as complete to log your reflection!"
            );
            if let Err(e) = port.send_dm(&user, &text).await {
                warn!(user = %user.id, task = %key.task, error = %e, "reminder delivery failed");
            }
            release_if_current(&timers, &key, generation);
        });

        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(old) = timers.insert(key, TimerEntry { generation, handle }) {
            debug!(user = %key.user, task = %key.task, "re-armed reminder, cancelling previous");
            old.handle.abort();
        }
    }

    /// Cancel a pending reminder. No-op when absent or already fired.
    pub fn cancel(&self, key: &TimerKey) {
        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = timers.remove(key) {
            entry.handle.abort();
        }
    }

    /// Whether a reminder is currently pending for the key.
    pub fn is_armed(&self, key: &TimerKey) -> bool {
        self.timers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(key)
    }

    pub fn active_count(&self) -> usize {
        self.timers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeliveryError;
    use crate::platform::ChannelId;
    use crate::summary::JournalEntry;
    use async_trait::async_trait;

    struct RecordingPort {
        dms: Mutex<Vec<String>>,
        fail_delivery: bool,
    }

    impl RecordingPort {
        fn new() -> Self {
            Self {
                dms: Mutex::new(Vec::new()),
                fail_delivery: false,
            }
        }

        fn dm_count(&self) -> usize {
            self.dms.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatPort for RecordingPort {
        async fn send_dm(&self, _user: &UserRef, text: &str) -> Result<(), DeliveryError> {
            if self.fail_delivery {
                return Err(DeliveryError::new("DMs disabled"));
            }
            self.dms.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn ask_yes_no(&self, _user: &UserRef, _q: &str) -> Result<bool, DeliveryError> {
            unimplemented!("not used by the scheduler")
        }

        async fn wait_for_reply(&self, _user: &UserRef) -> Result<String, DeliveryError> {
            unimplemented!("not used by the scheduler")
        }

        async fn post_journal(
            &self,
            _channel: ChannelId,
            _entry: &JournalEntry,
        ) -> Result<(), DeliveryError> {
            unimplemented!("not used by the scheduler")
        }
    }

    fn user() -> UserRef {
        UserRef {
            id: UserId(7),
            name: "Alex".into(),
            avatar_url: None,
        }
    }

    fn key(task: TaskId) -> TimerKey {
        TimerKey {
            user: UserId(7),
            task,
        }
    }

    async fn settle() {
        // Let spawned timer tasks observe advanced time.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reminder_fires_after_the_delay() {
        let port = Arc::new(RecordingPort::new());
        let scheduler = ReminderScheduler::new(port.clone());
        let key = key(TaskId::new());

        scheduler.arm(key, user(), "Write report".into(), Duration::from_secs(20 * 60));
        assert!(scheduler.is_armed(&key));

        tokio::time::advance(Duration::from_secs(20 * 60 + 1)).await;
        settle().await;

        assert_eq!(port.dm_count(), 1);
        assert!(!scheduler.is_armed(&key));
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_replaces_instead_of_stacking() {
        let port = Arc::new(RecordingPort::new());
        let scheduler = ReminderScheduler::new(port.clone());
        let key = key(TaskId::new());

        // Start at 20 minutes, then restart at 5 before the first fires.
        scheduler.arm(key, user(), "Report".into(), Duration::from_secs(20 * 60));
        scheduler.arm(key, user(), "Report".into(), Duration::from_secs(5 * 60));

        tokio::time::advance(Duration::from_secs(5 * 60 + 1)).await;
        settle().await;
        assert_eq!(port.dm_count(), 1);

        // The original 20-minute timer must not fire later.
        tokio::time::advance(Duration::from_secs(30 * 60)).await;
        settle().await;
        assert_eq!(port.dm_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_delivery_and_is_idempotent() {
        let port = Arc::new(RecordingPort::new());
        let scheduler = ReminderScheduler::new(port.clone());
        let key = key(TaskId::new());

        scheduler.arm(key, user(), "Report".into(), Duration::from_secs(60));
        scheduler.cancel(&key);
        scheduler.cancel(&key); // absent: no-op

        tokio::time::advance(Duration::from_secs(120)).await;
        settle().await;
        assert_eq!(port.dm_count(), 0);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn delivery_failure_still_releases_the_key() {
        let port = Arc::new(RecordingPort {
            dms: Mutex::new(Vec::new()),
            fail_delivery: true,
        });
        let scheduler = ReminderScheduler::new(port.clone());
        let key = key(TaskId::new());

        scheduler.arm(key, user(), "Report".into(), Duration::from_secs(60));
        tokio::time::advance(Duration::from_secs(61)).await;
        settle().await;

        assert!(!scheduler.is_armed(&key));
    }

    #[tokio::test(start_paused = true)]
    async fn late_cleanup_from_a_fired_timer_spares_the_replacement() {
        let port = Arc::new(RecordingPort::new());
        let scheduler = ReminderScheduler::new(port.clone());
        let key = key(TaskId::new());

        scheduler.arm(key, user(), "Report".into(), Duration::from_secs(60)); // generation 0
        scheduler.arm(key, user(), "Report".into(), Duration::from_secs(120)); // generation 1

        // A fired first timer running its cleanup after the re-arm must
        // not evict the replacement's registration.
        release_if_current(&scheduler.timers, &key, 0);
        assert!(scheduler.is_armed(&key));

        // The replacement's own cleanup still releases the key.
        release_if_current(&scheduler.timers, &key, 1);
        assert!(!scheduler.is_armed(&key));
    }

    #[tokio::test(start_paused = true)]
    async fn timers_for_different_tasks_are_independent() {
        let port = Arc::new(RecordingPort::new());
        let scheduler = ReminderScheduler::new(port.clone());
        let a = key(TaskId::new());
        let b = key(TaskId::new());

        scheduler.arm(a, user(), "A".into(), Duration::from_secs(60));
        scheduler.arm(b, user(), "B".into(), Duration::from_secs(120));
        assert_eq!(scheduler.active_count(), 2);

        tokio::time::advance(Duration::from_secs(61)).await;
        settle().await;
        assert_eq!(port.dm_count(), 1);
        assert!(scheduler.is_armed(&b));
    }
}
