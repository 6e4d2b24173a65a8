use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tasker_http::{AppState, router};
use tasker_storage::InMemoryStorage;
use tower::ServiceExt;

struct TestContext {
    app: Router,
}

impl TestContext {
    fn new() -> Self {
        let storage = Arc::new(InMemoryStorage::new());
        let state = AppState::new(storage.clone(), storage);

        Self { app: router(state) }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, value)
    }

    async fn create_task(&self, name: &str) -> String {
        let (status, task) = self
            .send("POST", "/api/v1/list/task", Some(json!({ "task": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED);

        task["task_id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn ping_answers_pong() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send("GET", "/api/v1/list/ping", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("pong"));
}

#[tokio::test]
async fn liveness_probe_is_ok() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send("GET", "/livez", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn task_without_name_is_rejected() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send("POST", "/api/v1/list/task", Some(json!({ "description": "?" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "task name is required");
}

#[tokio::test]
async fn finished_task_leaves_open_list() {
    let ctx = TestContext::new();
    let task_id = ctx.create_task("Pay rent").await;

    let (status, _) = ctx
        .send("DELETE", "/api/v1/list/task", Some(json!({ "task_id": task_id })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, open) = ctx.send("GET", "/api/v1/list/tasks", None).await;
    let (_, finished) = ctx.send("GET", "/api/v1/list/tasks/finished", None).await;
    let (status, _) = ctx
        .send("GET", &format!("/api/v1/list/task/{task_id}"), None)
        .await;

    assert_eq!(open, json!([]));
    assert_eq!(finished[0]["task_id"], task_id);
    assert_eq!(finished[0]["finished"], true);
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn task_can_be_renamed() {
    let ctx = TestContext::new();
    let task_id = ctx.create_task("Call mum").await;

    let (status, task) = ctx
        .send(
            "PUT",
            "/api/v1/list/task",
            Some(json!({ "task_id": task_id, "task": "Call mum and dad" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["task"], "Call mum and dad");
}

#[tokio::test]
async fn malformed_id_is_a_bad_request() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send("GET", "/api/v1/list/task/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid id `not-a-uuid`");
}

#[tokio::test]
async fn same_day_reminder_gets_next_occurrence() {
    let ctx = TestContext::new();
    let task_id = ctx.create_task("Hydrate").await;

    let (status, reminder) = ctx
        .send(
            "POST",
            "/api/v1/list/reminder",
            Some(json!({
                "task_id": task_id,
                "reminder": "Drink water",
                "frequency": "n",
                "interval_in_minutes": 30,
                "repeat_sameday": true,
                "start_time": "2024-01-01T08:00:00Z"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reminder["next_reminder"], "2024-01-01T08:30:00Z");
    assert_eq!(reminder["task_id"], task_id);

    let id = reminder["reminder_id"].as_str().unwrap();
    let (status, fetched) = ctx
        .send("GET", &format!("/api/v1/list/reminder/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, reminder);
}

#[tokio::test]
async fn invalid_weekday_code_is_reported() {
    let ctx = TestContext::new();
    let task_id = ctx.create_task("Gym").await;

    let (status, body) = ctx
        .send(
            "POST",
            "/api/v1/list/reminder",
            Some(json!({
                "task_id": task_id,
                "reminder": "Leg day",
                "frequency": "s",
                "repeat_days": ["mon", "xyz"],
                "interval": 1,
                "repeat_until": "2024-03-01T00:00:00Z",
                "start_time": "2024-01-01T08:00:00Z"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid reminder: unknown weekday code `xyz`");
}

#[tokio::test]
async fn reminder_for_unknown_task_is_not_found() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            "POST",
            "/api/v1/list/reminder",
            Some(json!({
                "task_id": "6f1c1f0e-6f43-4a4c-9f67-bd5d7d1b0e11",
                "reminder": "Orphan",
                "frequency": "d",
                "interval": 1,
                "repeat_until": "2024-01-10T00:00:00Z",
                "start_time": "2024-01-01T00:00:00Z"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "task not found");
}

#[tokio::test]
async fn reminder_without_task_id_fails_validation() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            "POST",
            "/api/v1/list/reminder",
            Some(json!({ "reminder": "Nothing", "frequency": "d" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid reminder: missing required field `task_id`");
}

#[tokio::test]
async fn update_revalidates_and_recomputes() {
    let ctx = TestContext::new();
    let task_id = ctx.create_task("Plants").await;
    let definition = json!({
        "task_id": task_id,
        "reminder": "Water plants",
        "frequency": "d",
        "interval": 1,
        "repeat_until": "2024-01-10T00:00:00Z",
        "start_time": "2024-01-01T00:00:00Z"
    });
    let (_, created) = ctx
        .send("POST", "/api/v1/list/reminder", Some(definition.clone()))
        .await;
    let id = created["reminder_id"].as_str().unwrap().to_string();
    assert_eq!(created["next_reminder"], "2024-01-02T00:00:00Z");

    let mut weekly = definition.clone();
    weekly["reminder_id"] = json!(id);
    weekly["frequency"] = json!("w");
    weekly.as_object_mut().unwrap().remove("start_time");
    let (status, updated) = ctx
        .send("PUT", "/api/v1/list/reminder", Some(weekly))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["next_reminder"], "2024-01-08T00:00:00Z");
    assert_eq!(updated["start_time"], "2024-01-01T00:00:00Z");

    let mut unbounded = definition.clone();
    unbounded["reminder_id"] = json!(id);
    unbounded["repeat_until"] = Value::Null;
    let (status, body) = ctx
        .send("PUT", "/api/v1/list/reminder", Some(unbounded))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid reminder: missing required field `repeat_until`");

    let (_, stored) = ctx
        .send("GET", &format!("/api/v1/list/reminder/{id}"), None)
        .await;
    assert_eq!(stored["frequency"], "w");
}

#[tokio::test]
async fn reminders_are_listed_per_task() {
    let ctx = TestContext::new();
    let first = ctx.create_task("First").await;
    let second = ctx.create_task("Second").await;
    for task_id in [&first, &second] {
        let (status, _) = ctx
            .send(
                "POST",
                "/api/v1/list/reminder",
                Some(json!({
                    "task_id": task_id,
                    "reminder": "Check",
                    "frequency": "m",
                    "interval": 1,
                    "repeat_until": "2025-01-01T00:00:00Z",
                    "start_time": "2024-01-31T09:00:00Z"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = ctx.send("GET", "/api/v1/list/reminders", None).await;
    let (_, of_first) = ctx
        .send("GET", &format!("/api/v1/list/reminder/task/{first}"), None)
        .await;

    assert_eq!(all.as_array().unwrap().len(), 2);
    assert_eq!(of_first.as_array().unwrap().len(), 1);
    assert_eq!(of_first[0]["next_reminder"], "2024-02-29T09:00:00Z");
}

#[tokio::test]
async fn update_without_reminder_id_is_rejected() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send("PUT", "/api/v1/list/reminder", Some(json!({ "reminder": "?" })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "reminder_id is required");
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let ctx = TestContext::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/list/task")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn weekday_table_is_served() {
    let ctx = TestContext::new();

    let (_, days) = ctx.send("GET", "/api/v1/list/days", None).await;
    let (status, sunday) = ctx.send("GET", "/api/v1/list/day/7", None).await;
    let (missing, _) = ctx.send("GET", "/api/v1/list/day/9", None).await;

    assert_eq!(days.as_array().unwrap().len(), 7);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sunday, json!({ "day_id": 7, "day_name": "sun" }));
    assert_eq!(missing, StatusCode::NOT_FOUND);
}
