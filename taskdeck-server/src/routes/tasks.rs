//! Task collection endpoints, nested under `/api`.
//!
//! Four CRUD operations mapping one-to-one onto [`TaskStore`] calls.
//! Update distinguishes "field omitted" from "field explicitly false" by
//! carrying the patch as optional fields end to end.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{OpenApi, ToSchema};

use crate::db::{Task, TaskPatch, TaskStore};
use crate::error::ServerError;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_tasks, create_task, update_task, delete_task),
    components(schemas(TaskResponse, CreateTask, UpdateTask))
)]
pub struct TasksApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", put(update_task).delete(delete_task))
}

#[derive(Deserialize, ToSchema)]
pub struct CreateTask {
    pub title: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

fn to_response(t: Task) -> TaskResponse {
    TaskResponse {
        id: t.id,
        title: t.title,
        completed: t.completed,
        created_at: t.created_at.to_rfc3339(),
        updated_at: t.updated_at.to_rfc3339(),
    }
}

#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "tasks",
    responses(
        (status = 200, description = "All tasks, newest first", body = [TaskResponse]),
        (status = 500, description = "Storage fault"),
    )
)]
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TaskResponse>>, ServerError> {
    let tasks = state.store.list_tasks().await?;
    Ok(Json(tasks.into_iter().map(to_response).collect()))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "tasks",
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Missing or blank title"),
    )
)]
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTask>,
) -> Result<(StatusCode, Json<TaskResponse>), ServerError> {
    let Some(title) = body.title.filter(|t| !t.trim().is_empty()) else {
        return Err(ServerError::BadRequest("title is required".to_owned()));
    };
    let task = state.store.insert_task(&title).await?;
    info!(task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(to_response(task))))
}

#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "ID of the task to update")
    ),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Blank title"),
        (status = 404, description = "Task not found"),
    )
)]
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTask>,
) -> Result<Json<TaskResponse>, ServerError> {
    if let Some(title) = &body.title {
        if title.trim().is_empty() {
            return Err(ServerError::BadRequest("title must not be empty".to_owned()));
        }
    }
    let patch = TaskPatch {
        title: body.title,
        completed: body.completed,
    };
    let task = state
        .store
        .update_task(&id, patch)
        .await?
        .ok_or_else(|| ServerError::NotFound("Task not found".to_owned()))?;
    info!(task_id = %id, "task updated");
    Ok(Json(to_response(task)))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "ID of the task to delete")
    ),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 404, description = "Task not found"),
        (status = 500, description = "Storage fault"),
    )
)]
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    if !state.store.delete_task(&id).await? {
        return Err(ServerError::NotFound("Task not found".to_owned()));
    }
    info!(task_id = %id, "task deleted");
    Ok(Json(serde_json::json!({ "message": "Task deleted" })))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::db::sqlite::SqliteStore;
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        let cfg = Config {
            bind_address: "127.0.0.1:0".to_owned(),
            database_url: "sqlite::memory:".to_owned(),
            log_level: "info".to_owned(),
            log_json: false,
            cors_allowed_origins: None,
            enable_swagger: false,
        };
        let store = SqliteStore::connect(&cfg.database_url).await.unwrap();
        crate::routes::build(Arc::new(AppState {
            config: Arc::new(cfg),
            store: Arc::new(store),
        }))
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_then_list_returns_task_first() {
        let app = app().await;

        let created = app
            .clone()
            .oneshot(json_request("POST", "/api/tasks", json!({ "title": "Buy milk" })))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = body_json(created).await;
        assert_eq!(created["title"], "Buy milk");
        assert_eq!(created["completed"], false);
        assert!(!created["id"].as_str().unwrap().is_empty());
        assert!(created["createdAt"].is_string());
        assert!(created["updatedAt"].is_string());

        let list = app
            .oneshot(empty_request("GET", "/api/tasks"))
            .await
            .unwrap();
        assert_eq!(list.status(), StatusCode::OK);
        let list = body_json(list).await;
        assert_eq!(list[0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let app = app().await;
        for title in ["first", "second", "third"] {
            let res = app
                .clone()
                .oneshot(json_request("POST", "/api/tasks", json!({ "title": title })))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::CREATED);
        }

        let list = body_json(app.oneshot(empty_request("GET", "/api/tasks")).await.unwrap()).await;
        let titles: Vec<&str> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn create_without_title_is_rejected() {
        let app = app().await;
        let res = app
            .clone()
            .oneshot(json_request("POST", "/api/tasks", json!({})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        assert!(body["error"].is_string());

        let res = app
            .oneshot(json_request("POST", "/api/tasks", json!({ "title": "   " })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_unknown_id_is_404() {
        let app = app().await;
        let res = app
            .oneshot(json_request(
                "PUT",
                "/api/tasks/999999",
                json!({ "completed": true }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res).await, json!({ "error": "Task not found" }));
    }

    #[tokio::test]
    async fn update_toggles_completed_and_keeps_title() {
        let app = app().await;
        let created = body_json(
            app.clone()
                .oneshot(json_request("POST", "/api/tasks", json!({ "title": "keep me" })))
                .await
                .unwrap(),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let updated = app
            .oneshot(json_request(
                "PUT",
                &format!("/api/tasks/{id}"),
                json!({ "completed": true }),
            ))
            .await
            .unwrap();
        assert_eq!(updated.status(), StatusCode::OK);
        let updated = body_json(updated).await;
        assert_eq!(updated["completed"], true);
        assert_eq!(updated["title"], "keep me");
    }

    #[tokio::test]
    async fn explicit_completed_false_is_applied() {
        let app = app().await;
        let created = body_json(
            app.clone()
                .oneshot(json_request("POST", "/api/tasks", json!({ "title": "flip" })))
                .await
                .unwrap(),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let res = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/tasks/{id}"),
                json!({ "completed": true }),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(res).await["completed"], true);

        // Regression: an explicit `false` must not be treated as "absent".
        let res = app
            .oneshot(json_request(
                "PUT",
                &format!("/api/tasks/{id}"),
                json!({ "completed": false }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["completed"], false);
    }

    #[tokio::test]
    async fn update_with_blank_title_is_rejected() {
        let app = app().await;
        let created = body_json(
            app.clone()
                .oneshot(json_request("POST", "/api/tasks", json!({ "title": "valid" })))
                .await
                .unwrap(),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let res = app
            .oneshot(json_request(
                "PUT",
                &format!("/api/tasks/{id}"),
                json!({ "title": "  " }),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_removes_task_and_repeat_is_404() {
        let app = app().await;
        let created = body_json(
            app.clone()
                .oneshot(json_request("POST", "/api/tasks", json!({ "title": "doomed" })))
                .await
                .unwrap(),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let res = app
            .clone()
            .oneshot(empty_request("DELETE", &format!("/api/tasks/{id}")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, json!({ "message": "Task deleted" }));

        let list = body_json(
            app.clone()
                .oneshot(empty_request("GET", "/api/tasks"))
                .await
                .unwrap(),
        )
        .await;
        assert!(list.as_array().unwrap().is_empty());

        let res = app
            .oneshot(empty_request("DELETE", &format!("/api/tasks/{id}")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res).await, json!({ "error": "Task not found" }));
    }

    #[tokio::test]
    async fn health_route_is_mounted() {
        let app = app().await;
        let res = app.oneshot(empty_request("GET", "/health")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["status"], "OK");
        assert!(body["timestamp"].is_string());
    }
}
