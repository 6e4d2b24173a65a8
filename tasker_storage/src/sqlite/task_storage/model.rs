use chrono::{DateTime, Utc};
use tasker_models::task::Task;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct TaskStorageModel {
    pub task_id: Uuid,
    pub task: String,
    pub description: String,
    pub finished: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TaskStorageModel> for Task {
    fn from(value: TaskStorageModel) -> Self {
        Self {
            task_id: value.task_id,
            task: value.task,
            description: value.description,
            finished: value.finished,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
