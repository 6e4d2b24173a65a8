use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tasker_models::{
    reminder::{Reminder, ReminderId},
    task::{Task, TaskId},
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{NewTask, ReminderStorage, StorageError, TaskStorage, UpdateTask};

#[derive(Default)]
struct InMemoryStore {
    tasks: HashMap<TaskId, Task>,
    reminders: HashMap<ReminderId, Reminder>,
}

/// Task and reminder store kept in process memory.
#[derive(Default)]
pub struct InMemoryStorage {
    store: RwLock<InMemoryStore>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_creation<T>(mut items: Vec<T>, key: impl Fn(&T) -> (DateTime<Utc>, Uuid)) -> Vec<T> {
    items.sort_by_key(|item| key(item));
    items
}

#[async_trait]
impl TaskStorage for InMemoryStorage {
    async fn insert(&self, task: NewTask) -> Result<Task, StorageError> {
        let now = Utc::now();
        let task = Task {
            task_id: Uuid::new_v4(),
            task: task.task,
            description: task.description,
            finished: false,
            created_at: now,
            updated_at: now,
        };

        self.store
            .write()
            .await
            .tasks
            .insert(task.task_id, task.clone());
        log::debug!("Inserted task {}", task.task_id);

        Ok(task)
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>, StorageError> {
        Ok(self.store.read().await.tasks.get(&id).cloned())
    }

    async fn get_all(&self, finished: bool) -> Result<Vec<Task>, StorageError> {
        let store = self.store.read().await;
        let tasks = store
            .tasks
            .values()
            .filter(|task| task.finished == finished)
            .cloned()
            .collect();

        Ok(sorted_by_creation(tasks, |task| (task.created_at, task.task_id)))
    }

    async fn update(&self, update_task: UpdateTask) -> Result<Option<Task>, StorageError> {
        let mut store = self.store.write().await;
        let Some(task) = store.tasks.get_mut(&update_task.task_id) else {
            return Ok(None);
        };

        task.task = update_task.task;
        task.description = update_task.description;
        task.updated_at = Utc::now();

        Ok(Some(task.clone()))
    }

    async fn finish(&self, id: TaskId) -> Result<Option<Task>, StorageError> {
        let mut store = self.store.write().await;
        let Some(task) = store.tasks.get_mut(&id) else {
            return Ok(None);
        };

        task.finished = true;
        task.updated_at = Utc::now();

        Ok(Some(task.clone()))
    }
}

#[async_trait]
impl ReminderStorage for InMemoryStorage {
    async fn insert(&self, reminder: Reminder) -> Result<Reminder, StorageError> {
        self.store
            .write()
            .await
            .reminders
            .insert(reminder.reminder_id, reminder.clone());
        log::debug!("Inserted reminder {}", reminder.reminder_id);

        Ok(reminder)
    }

    async fn get(&self, id: ReminderId) -> Result<Option<Reminder>, StorageError> {
        Ok(self.store.read().await.reminders.get(&id).cloned())
    }

    async fn get_by_task(&self, task_id: TaskId) -> Result<Vec<Reminder>, StorageError> {
        let store = self.store.read().await;
        let reminders = store
            .reminders
            .values()
            .filter(|reminder| reminder.task_id == task_id)
            .cloned()
            .collect();

        Ok(sorted_by_creation(reminders, |r| (r.created_at, r.reminder_id)))
    }

    async fn get_all(&self) -> Result<Vec<Reminder>, StorageError> {
        let store = self.store.read().await;
        let reminders = store.reminders.values().cloned().collect();

        Ok(sorted_by_creation(reminders, |r| (r.created_at, r.reminder_id)))
    }

    async fn update(&self, mut reminder: Reminder) -> Result<Option<Reminder>, StorageError> {
        let mut store = self.store.write().await;
        let Some(existing) = store.reminders.get_mut(&reminder.reminder_id) else {
            return Ok(None);
        };

        reminder.created_at = existing.created_at;
        reminder.updated_at = Utc::now();
        *existing = reminder.clone();

        Ok(Some(reminder))
    }

    async fn get_due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, StorageError> {
        let store = self.store.read().await;
        let is_task_open = |task_id: &TaskId| {
            store
                .tasks
                .get(task_id)
                .is_some_and(|task| !task.finished)
        };
        let due = store
            .reminders
            .values()
            .filter(|r| r.next_reminder.is_some_and(|next| next <= now))
            .filter(|r| is_task_open(&r.task_id))
            .cloned()
            .collect();

        Ok(sorted_by_creation(due, |r| (r.created_at, r.reminder_id)))
    }

    async fn set_next_reminder(
        &self,
        id: ReminderId,
        next_reminder: Option<DateTime<Utc>>,
    ) -> Result<(), StorageError> {
        if let Some(reminder) = self.store.write().await.reminders.get_mut(&id) {
            reminder.next_reminder = next_reminder;
        }

        Ok(())
    }
}
