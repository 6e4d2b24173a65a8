use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tasker_models::{
    reminder::{Reminder, ReminderId},
    task::TaskId,
};

/// Topic reminder notifications are published under.
pub const REMINDER_TOPIC: &str = "tasker_reminder_notify";

/// One firing of a reminder. `key` carries the reminder name and `value`
/// its description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderNotification {
    pub topic: &'static str,
    pub key: String,
    pub value: String,
    pub reminder_id: ReminderId,
    pub task_id: TaskId,
    pub due_at: DateTime<Utc>,
}

impl ReminderNotification {
    pub fn for_reminder(reminder: &Reminder, due_at: DateTime<Utc>) -> Self {
        Self {
            topic: REMINDER_TOPIC,
            key: reminder.reminder.clone(),
            value: reminder.description.clone(),
            reminder_id: reminder.reminder_id,
            task_id: reminder.task_id,
            due_at,
        }
    }
}

/// Sink for fired reminders. Message-bus publishers and desktop
/// notifiers plug in here; [`LogDeliveryChannel`] is the built-in one.
#[async_trait]
pub trait ReminderDeliveryChannel: Send + Sync + 'static {
    async fn deliver(&self, notification: &ReminderNotification) -> anyhow::Result<()>;
}

/// Writes every notification to the application log.
pub struct LogDeliveryChannel;

#[async_trait]
impl ReminderDeliveryChannel for LogDeliveryChannel {
    async fn deliver(&self, notification: &ReminderNotification) -> anyhow::Result<()> {
        log::info!(
            "[{}] {}: {} (reminder {}, due {})",
            notification.topic,
            notification.key,
            notification.value,
            notification.reminder_id,
            notification.due_at
        );
        Ok(())
    }
}
