use chrono::{DateTime, Utc};
use tasker_models::reminder::Reminder;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct ReminderStorageModel {
    pub reminder_id: Uuid,
    pub task_id: Uuid,
    pub reminder: String,
    pub description: String,
    pub start_time: Option<DateTime<Utc>>,
    pub frequency: String,
    pub repeat_days: String,
    pub repeat_sameday: bool,
    pub repeat_until: Option<DateTime<Utc>>,
    pub interval: Option<i64>,
    pub interval_in_minutes: Option<i64>,
    pub next_reminder: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reminder> for ReminderStorageModel {
    fn from(value: Reminder) -> Self {
        Self {
            reminder_id: value.reminder_id,
            task_id: value.task_id,
            reminder: value.reminder,
            description: value.description,
            start_time: value.start_time,
            frequency: value.frequency,
            repeat_days: join_days(&value.repeat_days),
            repeat_sameday: value.repeat_sameday,
            repeat_until: value.repeat_until,
            interval: value.interval,
            interval_in_minutes: value.interval_in_minutes,
            next_reminder: value.next_reminder,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<ReminderStorageModel> for Reminder {
    fn from(value: ReminderStorageModel) -> Self {
        Self {
            reminder_id: value.reminder_id,
            task_id: value.task_id,
            reminder: value.reminder,
            description: value.description,
            start_time: value.start_time,
            frequency: value.frequency,
            repeat_days: split_days(&value.repeat_days),
            repeat_sameday: value.repeat_sameday,
            repeat_until: value.repeat_until,
            interval: value.interval,
            interval_in_minutes: value.interval_in_minutes,
            next_reminder: value.next_reminder,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

fn join_days(days: &[String]) -> String {
    days.join(",")
}

fn split_days(days: &str) -> Vec<String> {
    days.split(',')
        .filter(|day| !day.is_empty())
        .map(str::to_string)
        .collect()
}
