mod model;

use async_trait::async_trait;
use chrono::Utc;
use model::TaskStorageModel;
use tasker_models::task::{Task, TaskId};
use uuid::Uuid;

use crate::{NewTask, StorageError, TaskStorage, UpdateTask};

pub struct SqliteTaskStorage {
    pool: sqlx::SqlitePool,
}

impl SqliteTaskStorage {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStorage for SqliteTaskStorage {
    async fn insert(&self, task: NewTask) -> Result<Task, StorageError> {
        let NewTask { task, description } = task;
        let now = Utc::now();

        let created_task = sqlx::query_as::<_, TaskStorageModel>(
            "INSERT INTO tasks (task_id, task, description, finished, created_at, updated_at)
VALUES (?, ?, ?, FALSE, ?, ?) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(task)
        .bind(description)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(created_task.into())
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>, StorageError> {
        let task =
            sqlx::query_as::<_, TaskStorageModel>("SELECT * FROM tasks WHERE task_id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(task.map(Into::into))
    }

    async fn get_all(&self, finished: bool) -> Result<Vec<Task>, StorageError> {
        let tasks = sqlx::query_as::<_, TaskStorageModel>(
            "SELECT * FROM tasks WHERE finished = ? ORDER BY created_at, task_id",
        )
        .bind(finished)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks.into_iter().map(Into::into).collect())
    }

    async fn update(&self, task: UpdateTask) -> Result<Option<Task>, StorageError> {
        let UpdateTask {
            task_id,
            task,
            description,
        } = task;

        let updated_task = sqlx::query_as::<_, TaskStorageModel>(
            "
UPDATE tasks
SET task = ?,
    description = ?,
    updated_at = ?
WHERE task_id = ?
RETURNING *
",
        )
        .bind(task)
        .bind(description)
        .bind(Utc::now())
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated_task.map(Into::into))
    }

    async fn finish(&self, id: TaskId) -> Result<Option<Task>, StorageError> {
        let finished_task = sqlx::query_as::<_, TaskStorageModel>(
            "UPDATE tasks SET finished = TRUE, updated_at = ? WHERE task_id = ? RETURNING *",
        )
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(finished_task.map(Into::into))
    }
}
