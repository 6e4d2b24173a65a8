use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tasker_models::task::{Task, TaskId};
use tasker_storage::{NewTask, UpdateTask};

use crate::{AppState, error::{ApiError, parse_id}};

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub task_id: TaskId,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct FinishTaskRequest {
    pub task_id: TaskId,
}

fn require_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("task name is required"));
    }
    Ok(())
}

pub async fn list_open(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.tasks.get_all(false).await?))
}

pub async fn list_finished(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.tasks.get_all(true).await?))
}

/// Finished tasks are hidden from direct lookup.
pub async fn get_open(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&uuid)?;

    state
        .tasks
        .get(id)
        .await?
        .filter(|task| !task.finished)
        .map(Json)
        .ok_or(ApiError::NotFound("task"))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(request) = payload?;
    require_name(&request.task)?;

    let task = state
        .tasks
        .insert(NewTask {
            task: request.task,
            description: request.description,
        })
        .await?;
    log::info!("Task {} ({}) created", task.task, task.task_id);

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update(
    State(state): State<AppState>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(request) = payload?;
    require_name(&request.task)?;

    let task = state
        .tasks
        .update(UpdateTask {
            task_id: request.task_id,
            task: request.task,
            description: request.description,
        })
        .await?
        .ok_or(ApiError::NotFound("task"))?;
    log::info!("Task {} ({}) updated", task.task, task.task_id);

    Ok(Json(task))
}

pub async fn finish(
    State(state): State<AppState>,
    payload: Result<Json<FinishTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(request) = payload?;

    let task = state
        .tasks
        .finish(request.task_id)
        .await?
        .ok_or(ApiError::NotFound("task"))?;
    log::info!("Task {} ({}) finished", task.task, task.task_id);

    Ok(Json(task))
}
