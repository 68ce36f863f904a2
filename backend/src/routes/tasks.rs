//! Task routes
//!
//! All task routes are scoped to the authenticated caller; a task belonging
//! to someone else is indistinguishable from one that does not exist.

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::{StatsService, TaskService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use health_hub_shared::types::{
    CreateTaskRequest, TaskListQuery, TaskListResponse, TaskMessageResponse, TaskResponse,
    TaskStatsResponse, UpdateTaskRequest,
};
use uuid::Uuid;

/// Create task routes
pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/stats/summary", get(stats_summary))
        .route("/:id", get(get_task).put(update_task).delete(delete_task))
        .route("/:id/toggle", patch(toggle_task))
}

fn parse_task_id(id: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| ApiError::NotFound("Task not found".to_string()))
}

/// GET /api/tasks
///
/// Filters: completed=true|false, category=<label>|all. Paginated with
/// page (1-based) and limit (default 10, max 100).
async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    let response = TaskService::list(state.db(), auth.user_id, query).await?;
    Ok(Json(response))
}

/// POST /api/tasks
async fn create_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskMessageResponse>)> {
    let task = TaskService::create(state.db(), auth.user_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(TaskMessageResponse {
            message: "Task created successfully".to_string(),
            task,
        }),
    ))
}

/// GET /api/tasks/:id
async fn get_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskResponse>> {
    let id = parse_task_id(&id)?;
    let task = TaskService::get(state.db(), auth.user_id, id).await?;
    Ok(Json(task))
}

/// PUT /api/tasks/:id
async fn update_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskMessageResponse>> {
    let id = parse_task_id(&id)?;
    let task = TaskService::update(state.db(), auth.user_id, id, req).await?;
    Ok(Json(TaskMessageResponse {
        message: "Task updated successfully".to_string(),
        task,
    }))
}

/// DELETE /api/tasks/:id
async fn delete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = parse_task_id(&id)?;
    TaskService::delete(state.db(), auth.user_id, id).await?;
    Ok(Json(
        serde_json::json!({ "message": "Task deleted successfully" }),
    ))
}

/// PATCH /api/tasks/:id/toggle
async fn toggle_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskMessageResponse>> {
    let id = parse_task_id(&id)?;
    let (task, message) = TaskService::toggle(state.db(), auth.user_id, id).await?;
    Ok(Json(TaskMessageResponse { message, task }))
}

/// GET /api/tasks/stats/summary
async fn stats_summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<TaskStatsResponse>> {
    let stats = StatsService::summary(state.db(), auth.user_id).await?;
    Ok(Json(stats))
}
