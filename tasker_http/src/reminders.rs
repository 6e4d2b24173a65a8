use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tasker_models::{
    reminder::{Reminder, ReminderId},
    task::TaskId,
};
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, parse_id},
};

/// Reminder definition as submitted by a client. Missing identifiers and
/// names are left empty here and reported by the recurrence checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReminderRequest {
    #[serde(default)]
    pub reminder_id: Option<ReminderId>,
    #[serde(default)]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub reminder: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub repeat_days: Vec<String>,
    #[serde(default)]
    pub repeat_sameday: bool,
    #[serde(default)]
    pub repeat_until: Option<DateTime<Utc>>,
    #[serde(default, alias = "inteval")]
    pub interval: Option<i64>,
    #[serde(default)]
    pub interval_in_minutes: Option<i64>,
}

impl ReminderRequest {
    fn into_reminder(
        self,
        reminder_id: ReminderId,
        start_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Reminder {
        Reminder {
            reminder_id,
            task_id: self.task_id.unwrap_or(Uuid::nil()),
            reminder: self.reminder,
            description: self.description,
            start_time: Some(self.start_time.unwrap_or(start_time)),
            frequency: self.frequency,
            repeat_days: self.repeat_days,
            repeat_sameday: self.repeat_sameday,
            repeat_until: self.repeat_until,
            interval: self.interval,
            interval_in_minutes: self.interval_in_minutes,
            next_reminder: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Runs the recurrence checks, fills in `next_reminder` and makes sure the
/// owning task exists.
async fn prepare(state: &AppState, mut reminder: Reminder) -> Result<Reminder, ApiError> {
    let next = tasker_recurrence::validate(&reminder).inspect_err(|error| {
        log::info!("Rejected reminder {}: {error}", reminder.reminder_id);
    })?;
    reminder.next_reminder = Some(next);

    if state.tasks.get(reminder.task_id).await?.is_none() {
        return Err(ApiError::NotFound("task"));
    }

    Ok(reminder)
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Reminder>>, ApiError> {
    Ok(Json(state.reminders.get_all().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<Reminder>, ApiError> {
    let id = parse_id(&uuid)?;

    state
        .reminders
        .get(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("reminder"))
}

pub async fn list_by_task(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<Vec<Reminder>>, ApiError> {
    let task_id = parse_id(&uuid)?;

    Ok(Json(state.reminders.get_by_task(task_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ReminderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Reminder>), ApiError> {
    let Json(request) = payload?;
    let now = Utc::now();

    let reminder = request.into_reminder(Uuid::new_v4(), now, now);
    let reminder = prepare(&state, reminder).await?;
    let reminder = state.reminders.insert(reminder).await?;
    log::info!(
        "Reminder {} ({}) for task ({}) created",
        reminder.reminder,
        reminder.reminder_id,
        reminder.task_id
    );

    Ok((StatusCode::CREATED, Json(reminder)))
}

/// Replaces a stored definition. An omitted `start_time` keeps the stored
/// anchor.
pub async fn update(
    State(state): State<AppState>,
    payload: Result<Json<ReminderRequest>, JsonRejection>,
) -> Result<Json<Reminder>, ApiError> {
    let Json(request) = payload?;
    let reminder_id = request
        .reminder_id
        .ok_or(ApiError::BadRequest("reminder_id is required"))?;

    let existing = state
        .reminders
        .get(reminder_id)
        .await?
        .ok_or(ApiError::NotFound("reminder"))?;
    let start_time = existing.start_time.unwrap_or_else(Utc::now);

    let reminder = request.into_reminder(reminder_id, start_time, existing.created_at);
    let reminder = prepare(&state, reminder).await?;
    let reminder = state
        .reminders
        .update(reminder)
        .await?
        .ok_or(ApiError::NotFound("reminder"))?;
    log::info!(
        "Reminder {} ({}) for task ({}) updated",
        reminder.reminder,
        reminder.reminder_id,
        reminder.task_id
    );

    Ok(Json(reminder))
}
