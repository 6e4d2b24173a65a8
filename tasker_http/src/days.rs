use axum::{Json, extract::Path};
use tasker_models::day::Day;

use crate::ApiError;

pub async fn list() -> Json<[Day; 7]> {
    Json(Day::all())
}

pub async fn get(Path(id): Path<String>) -> Result<Json<Day>, ApiError> {
    let day_id: u8 = id.parse().map_err(|_| ApiError::InvalidId(id.clone()))?;

    Day::by_id(day_id)
        .map(Json)
        .ok_or(ApiError::NotFound("day"))
}
