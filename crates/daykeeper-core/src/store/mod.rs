//! Document store contract and typed per-collection adapters.
//!
//! Documents are read and written whole; there are no field-level updates.
//! Writes carry a [`WriteExpectation`] so multi-step read-modify-write
//! operations can detect an interleaving writer instead of silently losing
//! the update.

pub mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::config::UserConfig;
use crate::error::{Result, StoreError};
use crate::habits::HabitRecord;
use crate::platform::UserId;
use crate::schedule::Schedule;

/// Returns `~/.config/daykeeper[-dev]/` based on DAYKEEPER_ENV.
///
/// Set DAYKEEPER_ENV=dev to use the development data directory.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYKEEPER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("daykeeper-dev")
    } else {
        base_dir.join("daykeeper")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Hierarchical document key: user id → category → date or "main".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath(String);

impl DocPath {
    pub fn user_config(user: UserId) -> Self {
        Self(format!("users/{user}/config/main"))
    }

    pub fn schedule(user: UserId, date: NaiveDate) -> Self {
        Self(format!("users/{user}/schedules/{date}"))
    }

    pub fn habits(user: UserId, date: NaiveDate) -> Self {
        Self(format!("users/{user}/habits/{date}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document body plus the revision it was read at.
#[derive(Debug, Clone)]
pub struct VersionedDoc {
    pub body: Value,
    pub revision: u64,
}

/// Concurrency expectation for a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteExpectation {
    /// Unconditional overwrite; last writer wins.
    Any,
    /// The document must not exist yet (lazy-create guard).
    Absent,
    /// The document must still be at this revision (compare-and-swap).
    Revision(u64),
}

/// Backing document store: whole-document get and expectation-checked put.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &DocPath) -> Result<Option<VersionedDoc>, StoreError>;

    /// Write a document, enforcing `expect`. Returns the new revision.
    async fn put(
        &self,
        path: &DocPath,
        body: Value,
        expect: WriteExpectation,
    ) -> Result<u64, StoreError>;
}

/// Typed adapter over the user-config collection.
#[derive(Clone)]
pub struct ConfigStore {
    store: Arc<dyn DocumentStore>,
}

impl ConfigStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self, user: UserId) -> Result<Option<UserConfig>> {
        let path = DocPath::user_config(user);
        match self.store.get(&path).await? {
            Some(doc) => {
                let config = serde_json::from_value(doc.body).map_err(StoreError::Serialize)?;
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }

    /// Full overwrite; setup always replaces the previous config.
    pub async fn save(&self, user: UserId, config: &UserConfig) -> Result<()> {
        let path = DocPath::user_config(user);
        let body = serde_json::to_value(config).map_err(StoreError::Serialize)?;
        self.store.put(&path, body, WriteExpectation::Any).await?;
        Ok(())
    }
}

/// Typed adapter over the per-day schedule collection.
#[derive(Clone)]
pub struct ScheduleStore {
    store: Arc<dyn DocumentStore>,
}

impl ScheduleStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Fetch the schedule for (user, date), creating and persisting the
    /// default 4-slot layout if none exists yet.
    ///
    /// Returns the schedule and the revision to pass to [`Self::save`].
    /// Creation uses an absence guard, so two racing first accesses
    /// converge on a single stored document.
    pub async fn get_or_create(
        &self,
        user: UserId,
        date: NaiveDate,
        start_hour: u8,
    ) -> Result<(Schedule, u64)> {
        let path = DocPath::schedule(user, date);
        if let Some(doc) = self.store.get(&path).await? {
            let schedule = serde_json::from_value(doc.body).map_err(StoreError::Serialize)?;
            return Ok((schedule, doc.revision));
        }

        let schedule = Schedule::new(date, start_hour);
        let body = serde_json::to_value(&schedule).map_err(StoreError::Serialize)?;
        match self.store.put(&path, body, WriteExpectation::Absent).await {
            Ok(revision) => {
                debug!(%path, "created default schedule");
                Ok((schedule, revision))
            }
            Err(StoreError::RevisionConflict { .. }) => {
                // Lost the create race; take the winner's document.
                let doc = self
                    .store
                    .get(&path)
                    .await?
                    .ok_or_else(|| StoreError::QueryFailed(format!("document '{path}' vanished")))?;
                let schedule = serde_json::from_value(doc.body).map_err(StoreError::Serialize)?;
                Ok((schedule, doc.revision))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the whole schedule, guarded by the revision it was read at.
    /// Returns the new revision. An interleaving writer surfaces as
    /// [`StoreError::RevisionConflict`].
    pub async fn save(&self, user: UserId, schedule: &Schedule, revision: u64) -> Result<u64> {
        let path = DocPath::schedule(user, schedule.date);
        let body = serde_json::to_value(schedule).map_err(StoreError::Serialize)?;
        let new_revision = self
            .store
            .put(&path, body, WriteExpectation::Revision(revision))
            .await?;
        Ok(new_revision)
    }
}

/// Typed adapter over the per-day habit-record collection.
#[derive(Clone)]
pub struct HabitStore {
    store: Arc<dyn DocumentStore>,
}

impl HabitStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Full overwrite: a later check-in for the same day wins. Accepted
    /// race, not guarded.
    pub async fn save(&self, user: UserId, record: &HabitRecord) -> Result<()> {
        let path = DocPath::habits(user, record.date);
        let body = serde_json::to_value(record).map_err(StoreError::Serialize)?;
        self.store.put(&path, body, WriteExpectation::Any).await?;
        Ok(())
    }

    pub async fn load(&self, user: UserId, date: NaiveDate) -> Result<Option<HabitRecord>> {
        let path = DocPath::habits(user, date);
        match self.store.get(&path).await? {
            Some(doc) => {
                let record = serde_json::from_value(doc.body).map_err(StoreError::Serialize)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Arc<dyn DocumentStore> {
        Arc::new(SqliteStore::open_memory().unwrap())
    }

    #[test]
    fn doc_paths_mirror_the_collection_hierarchy() {
        let user = UserId(42);
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(DocPath::user_config(user).as_str(), "users/42/config/main");
        assert_eq!(
            DocPath::schedule(user, date).as_str(),
            "users/42/schedules/2026-08-30"
        );
        assert_eq!(
            DocPath::habits(user, date).as_str(),
            "users/42/habits/2026-08-30"
        );
    }

    #[tokio::test]
    async fn get_or_create_persists_the_default_layout() {
        let schedules = ScheduleStore::new(store());
        let user = UserId(1);
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();

        let (created, rev1) = schedules.get_or_create(user, date, 22).await.unwrap();
        let hours: Vec<u8> = created.slots.iter().map(|s| s.start_hour).collect();
        assert_eq!(hours, vec![22, 2, 6, 10]);

        // Second access reads the stored document instead of recreating.
        let (fetched, rev2) = schedules.get_or_create(user, date, 5).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(rev1, rev2);
    }

    #[tokio::test]
    async fn stale_revision_save_is_a_conflict() {
        let schedules = ScheduleStore::new(store());
        let user = UserId(1);
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();

        let (mut a, rev) = schedules.get_or_create(user, date, 7).await.unwrap();
        let (mut b, _) = schedules.get_or_create(user, date, 7).await.unwrap();

        crate::schedule::alloc::add_task(&mut a, "first writer", 30).unwrap();
        let new_rev = schedules.save(user, &a, rev).await.unwrap();
        assert!(new_rev > rev);

        crate::schedule::alloc::add_task(&mut b, "second writer", 30).unwrap();
        let err = schedules.save(user, &b, rev).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::CoreError::Store(StoreError::RevisionConflict { .. })
        ));
    }

    #[tokio::test]
    async fn habit_record_save_is_last_writer_wins() {
        let habits = HabitStore::new(store());
        let user = UserId(1);
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();

        let first = HabitRecord {
            date,
            answers: vec![],
        };
        habits.save(user, &first).await.unwrap();

        let second = HabitRecord {
            date,
            answers: vec![crate::habits::HabitAnswer {
                habit: "Meditate".into(),
                polarity: crate::habits::HabitPolarity::Positive,
                answered_yes: true,
            }],
        };
        habits.save(user, &second).await.unwrap();

        let loaded = habits.load(user, date).await.unwrap().unwrap();
        assert_eq!(loaded, second);
    }

    #[tokio::test]
    async fn config_load_returns_none_before_setup() {
        let configs = ConfigStore::new(store());
        assert!(configs.load(UserId(9)).await.unwrap().is_none());
    }
}
