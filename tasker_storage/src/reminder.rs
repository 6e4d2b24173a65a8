use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tasker_models::{
    reminder::{Reminder, ReminderId},
    task::TaskId,
};

use crate::StorageError;

/// Persistence for reminders. Callers are expected to run the recurrence
/// checks before `insert` and `update`; the store does not re-validate.
#[async_trait]
pub trait ReminderStorage: Send + Sync {
    async fn insert(&self, reminder: Reminder) -> Result<Reminder, StorageError>;
    async fn get(&self, id: ReminderId) -> Result<Option<Reminder>, StorageError>;
    async fn get_by_task(&self, task_id: TaskId) -> Result<Vec<Reminder>, StorageError>;
    async fn get_all(&self) -> Result<Vec<Reminder>, StorageError>;
    /// Replaces the definition. `created_at` is kept, `updated_at` is
    /// refreshed.
    async fn update(&self, reminder: Reminder) -> Result<Option<Reminder>, StorageError>;
    /// Reminders with `next_reminder <= now` that belong to unfinished tasks.
    async fn get_due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, StorageError>;
    async fn set_next_reminder(
        &self,
        id: ReminderId,
        next_reminder: Option<DateTime<Utc>>,
    ) -> Result<(), StorageError>;
}
