mod days;
mod error;
mod reminders;
mod request_log;
mod tasks;

use std::{future::Future, sync::Arc};

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tasker_storage::{ReminderStorage, TaskStorage};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use error::ApiError;
pub use reminders::ReminderRequest;

/// Collaborators shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn TaskStorage>,
    pub reminders: Arc<dyn ReminderStorage>,
}

impl AppState {
    pub fn new(tasks: Arc<dyn TaskStorage>, reminders: Arc<dyn ReminderStorage>) -> Self {
        Self { tasks, reminders }
    }
}

pub fn router(state: AppState) -> Router {
    let list = Router::new()
        .route("/ping", get(ping))
        .route("/tasks", get(tasks::list_open))
        .route("/tasks/finished", get(tasks::list_finished))
        .route("/task/{uuid}", get(tasks::get_open))
        .route(
            "/task",
            post(tasks::create).put(tasks::update).delete(tasks::finish),
        )
        .route("/reminders", get(reminders::list))
        .route("/reminder/{uuid}", get(reminders::get))
        .route("/reminder/task/{uuid}", get(reminders::list_by_task))
        .route("/reminder", post(reminders::create).put(reminders::update))
        .route("/days", get(days::list))
        .route("/day/{id}", get(days::get));

    Router::new()
        .route("/livez", get(livez))
        .nest("/api/v1/list", list)
        .layer(middleware::from_fn(request_log::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(address) = listener.local_addr() {
        log::info!("Server listening on http://{address}");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn ping() -> &'static str {
    "pong"
}

async fn livez() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
