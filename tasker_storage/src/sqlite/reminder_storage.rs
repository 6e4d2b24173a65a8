mod model;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::ReminderStorageModel;
use tasker_models::{
    reminder::{Reminder, ReminderId},
    task::TaskId,
};

use crate::{ReminderStorage, StorageError};

pub struct SqliteReminderStorage {
    pool: sqlx::SqlitePool,
}

impl SqliteReminderStorage {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderStorage for SqliteReminderStorage {
    async fn insert(&self, reminder: Reminder) -> Result<Reminder, StorageError> {
        let ReminderStorageModel {
            reminder_id,
            task_id,
            reminder,
            description,
            start_time,
            frequency,
            repeat_days,
            repeat_sameday,
            repeat_until,
            interval,
            interval_in_minutes,
            next_reminder,
            created_at,
            updated_at,
        } = reminder.into();

        let created_reminder = sqlx::query_as::<_, ReminderStorageModel>(
            r#"INSERT INTO reminders (
    reminder_id, task_id, reminder, description, start_time, frequency, repeat_days,
    repeat_sameday, repeat_until, "interval", interval_in_minutes, next_reminder,
    created_at, updated_at
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"#,
        )
        .bind(reminder_id)
        .bind(task_id)
        .bind(reminder)
        .bind(description)
        .bind(start_time)
        .bind(frequency)
        .bind(repeat_days)
        .bind(repeat_sameday)
        .bind(repeat_until)
        .bind(interval)
        .bind(interval_in_minutes)
        .bind(next_reminder)
        .bind(created_at)
        .bind(updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created_reminder.into())
    }

    async fn get(&self, id: ReminderId) -> Result<Option<Reminder>, StorageError> {
        let reminder = sqlx::query_as::<_, ReminderStorageModel>(
            "SELECT * FROM reminders WHERE reminder_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reminder.map(Into::into))
    }

    async fn get_by_task(&self, task_id: TaskId) -> Result<Vec<Reminder>, StorageError> {
        let reminders = sqlx::query_as::<_, ReminderStorageModel>(
            "SELECT * FROM reminders WHERE task_id = ? ORDER BY created_at, reminder_id",
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders.into_iter().map(Into::into).collect())
    }

    async fn get_all(&self) -> Result<Vec<Reminder>, StorageError> {
        let reminders = sqlx::query_as::<_, ReminderStorageModel>(
            "SELECT * FROM reminders ORDER BY created_at, reminder_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders.into_iter().map(Into::into).collect())
    }

    async fn update(&self, reminder: Reminder) -> Result<Option<Reminder>, StorageError> {
        let ReminderStorageModel {
            reminder_id,
            task_id,
            reminder,
            description,
            start_time,
            frequency,
            repeat_days,
            repeat_sameday,
            repeat_until,
            interval,
            interval_in_minutes,
            next_reminder,
            created_at: _,
            updated_at: _,
        } = reminder.into();

        let updated_reminder = sqlx::query_as::<_, ReminderStorageModel>(
            r#"
UPDATE reminders
SET task_id = ?,
    reminder = ?,
    description = ?,
    start_time = ?,
    frequency = ?,
    repeat_days = ?,
    repeat_sameday = ?,
    repeat_until = ?,
    "interval" = ?,
    interval_in_minutes = ?,
    next_reminder = ?,
    updated_at = ?
WHERE reminder_id = ?
RETURNING *
"#,
        )
        .bind(task_id)
        .bind(reminder)
        .bind(description)
        .bind(start_time)
        .bind(frequency)
        .bind(repeat_days)
        .bind(repeat_sameday)
        .bind(repeat_until)
        .bind(interval)
        .bind(interval_in_minutes)
        .bind(next_reminder)
        .bind(Utc::now())
        .bind(reminder_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated_reminder.map(Into::into))
    }

    async fn get_due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, StorageError> {
        // Compare through julianday() so differently formatted fractional
        // seconds still order correctly.
        let reminders = sqlx::query_as::<_, ReminderStorageModel>(
            "
SELECT r.*
FROM reminders r
JOIN tasks t ON t.task_id = r.task_id
WHERE t.finished = FALSE
  AND r.next_reminder IS NOT NULL
  AND julianday(r.next_reminder) <= julianday(?)
ORDER BY r.created_at, r.reminder_id
",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders.into_iter().map(Into::into).collect())
    }

    async fn set_next_reminder(
        &self,
        id: ReminderId,
        next_reminder: Option<DateTime<Utc>>,
    ) -> Result<(), StorageError> {
        sqlx::query("UPDATE reminders SET next_reminder = ? WHERE reminder_id = ?")
            .bind(next_reminder)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use uuid::Uuid;

    use super::*;
    use crate::{
        NewTask, TaskStorage,
        sqlite::{connect_in_memory, task_storage::SqliteTaskStorage},
    };

    struct TestContext {
        tasks: SqliteTaskStorage,
        reminders: SqliteReminderStorage,
    }

    impl TestContext {
        async fn new() -> Self {
            let pool = connect_in_memory().await.unwrap();
            Self {
                tasks: SqliteTaskStorage::new(pool.clone()),
                reminders: SqliteReminderStorage::new(pool),
            }
        }

        async fn task(&self) -> TaskId {
            self.tasks
                .insert(NewTask {
                    task: "Plants".to_string(),
                    description: String::new(),
                })
                .await
                .unwrap()
                .task_id
        }
    }

    fn weekly_reminder(task_id: TaskId, next_reminder: Option<DateTime<Utc>>) -> Reminder {
        let start: DateTime<Utc> = "2024-01-01T08:00:00Z".parse().unwrap();
        Reminder {
            reminder_id: Uuid::new_v4(),
            task_id,
            reminder: "Water plants".to_string(),
            description: "Balcony first".to_string(),
            start_time: Some(start),
            frequency: "s".to_string(),
            repeat_days: vec!["mon".to_string(), "thu".to_string()],
            repeat_sameday: false,
            repeat_until: Some(start + Duration::days(90)),
            interval: Some(1),
            interval_in_minutes: None,
            next_reminder,
            created_at: start,
            updated_at: start,
        }
    }

    #[tokio::test]
    async fn reminder_fields_survive_a_round_trip() {
        let ctx = TestContext::new().await;
        let task_id = ctx.task().await;
        let reminder = weekly_reminder(task_id, Some("2024-01-04T08:00:00Z".parse().unwrap()));

        ctx.reminders.insert(reminder.clone()).await.unwrap();
        let fetched = ctx.reminders.get(reminder.reminder_id).await.unwrap();

        assert_eq!(fetched, Some(reminder));
    }

    #[tokio::test]
    async fn reminder_requires_existing_task() {
        let ctx = TestContext::new().await;

        let result = ctx
            .reminders
            .insert(weekly_reminder(Uuid::new_v4(), None))
            .await;

        assert!(matches!(result, Err(StorageError::Sqlx(_))));
    }

    #[tokio::test]
    async fn reminders_are_listed_per_task() {
        let ctx = TestContext::new().await;
        let first_task = ctx.task().await;
        let second_task = ctx.task().await;
        let first = weekly_reminder(first_task, None);
        let second = weekly_reminder(second_task, None);
        ctx.reminders.insert(first.clone()).await.unwrap();
        ctx.reminders.insert(second.clone()).await.unwrap();

        let of_first = ctx.reminders.get_by_task(first_task).await.unwrap();
        let all = ctx.reminders.get_all().await.unwrap();

        assert_eq!(of_first, vec![first]);
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn update_replaces_definition_but_keeps_creation_time() {
        let ctx = TestContext::new().await;
        let task_id = ctx.task().await;
        let original = weekly_reminder(task_id, None);
        ctx.reminders.insert(original.clone()).await.unwrap();

        let mut changed = original.clone();
        changed.repeat_days = vec!["sat".to_string()];
        changed.created_at = original.created_at + Duration::days(3);
        let updated = ctx.reminders.update(changed).await.unwrap().unwrap();

        assert_eq!(updated.repeat_days, vec!["sat".to_string()]);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at > original.updated_at);
    }

    #[tokio::test]
    async fn due_reminders_exclude_future_exhausted_and_finished() {
        let ctx = TestContext::new().await;
        let open_task = ctx.task().await;
        let finished_task = ctx.task().await;
        ctx.tasks.finish(finished_task).await.unwrap();
        let now: DateTime<Utc> = "2024-01-04T08:00:00.5Z".parse().unwrap();

        let due = weekly_reminder(open_task, Some("2024-01-04T08:00:00Z".parse().unwrap()));
        let future = weekly_reminder(open_task, Some(now + Duration::milliseconds(250)));
        let exhausted = weekly_reminder(open_task, None);
        let of_finished = weekly_reminder(finished_task, Some(now - Duration::days(1)));
        for reminder in [&due, &future, &exhausted, &of_finished] {
            ctx.reminders.insert(reminder.clone()).await.unwrap();
        }

        let found = ctx.reminders.get_due(now).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].reminder_id, due.reminder_id);
    }

    #[tokio::test]
    async fn next_reminder_can_be_advanced_and_cleared() {
        let ctx = TestContext::new().await;
        let task_id = ctx.task().await;
        let reminder = weekly_reminder(task_id, None);
        ctx.reminders.insert(reminder.clone()).await.unwrap();
        let next: DateTime<Utc> = "2024-01-08T08:00:00Z".parse().unwrap();

        ctx.reminders
            .set_next_reminder(reminder.reminder_id, Some(next))
            .await
            .unwrap();
        let advanced = ctx.reminders.get(reminder.reminder_id).await.unwrap();
        ctx.reminders
            .set_next_reminder(reminder.reminder_id, None)
            .await
            .unwrap();
        let cleared = ctx.reminders.get(reminder.reminder_id).await.unwrap();

        assert_eq!(advanced.unwrap().next_reminder, Some(next));
        assert_eq!(cleared.unwrap().next_reminder, None);
    }
}
