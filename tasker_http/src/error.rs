use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tasker_recurrence::RecurrenceError;
use tasker_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid reminder: {0}")]
    InvalidReminder(#[from] RecurrenceError),

    #[error("{0}")]
    BadRequest(&'static str),

    #[error("invalid id `{0}`")]
    InvalidId(String),

    #[error("invalid JSON input: {0}")]
    InvalidJson(#[from] JsonRejection),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidReminder(_)
            | Self::BadRequest(_)
            | Self::InvalidId(_)
            | Self::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Storage(error) => {
                log::error!("Storage failure while handling request: {error}");
                "internal storage error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub fn parse_id(raw: &str) -> Result<uuid::Uuid, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidId(raw.to_string()))
}
