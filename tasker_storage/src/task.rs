use async_trait::async_trait;
use tasker_models::task::{Task, TaskId};

use crate::StorageError;

pub struct NewTask {
    pub task: String,
    pub description: String,
}

pub struct UpdateTask {
    pub task_id: TaskId,
    pub task: String,
    pub description: String,
}

#[async_trait]
pub trait TaskStorage: Send + Sync {
    async fn insert(&self, task: NewTask) -> Result<Task, StorageError>;
    async fn get(&self, id: TaskId) -> Result<Option<Task>, StorageError>;
    async fn get_all(&self, finished: bool) -> Result<Vec<Task>, StorageError>;
    /// Returns `None` when no task has the given id.
    async fn update(&self, task: UpdateTask) -> Result<Option<Task>, StorageError>;
    /// Tasks are never removed, only marked finished.
    async fn finish(&self, id: TaskId) -> Result<Option<Task>, StorageError>;
}
