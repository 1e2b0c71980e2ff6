/// Task CRUD endpoints
///
/// All endpoints require authentication. Every per-task operation checks the
/// authorization policy: the owner or an admin may proceed, anyone else gets
/// 403. A task that doesn't exist yields 404 before any authorization check
/// runs.
///
/// # Endpoints
///
/// - `POST   /v1/tasks` - Create a task (owner is always the requester)
/// - `GET    /v1/tasks` - List tasks (scope depends on role; `?mine=true`
///   narrows an admin to their own tasks)
/// - `GET    /v1/tasks/:id` - Fetch one task
/// - `PUT    /v1/tasks/:id` - Update mutable fields
/// - `DELETE /v1/tasks/:id` - Delete permanently

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::validation_error,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use taskforge_shared::{
    auth::{
        authorization::{authorize_task_access, task_list_scope, TaskScope},
        middleware::AuthContext,
    },
    models::task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask},
};

/// Request body for creating a task
///
/// There is deliberately no owner field: the owner is always the
/// authenticated requester. A client cannot create tasks on another
/// user's behalf.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (defaults to "pending")
    pub status: Option<TaskStatus>,

    /// Initial priority (defaults to "medium")
    pub priority: Option<TaskPriority>,
}

/// Request body for updating a task
///
/// All fields optional; absent fields are left untouched. The owner cannot
/// be changed through this endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,
}

/// Query parameters for listing tasks
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    /// When true, an admin sees only their own tasks instead of all tasks.
    /// Ignored for regular users, who only ever see their own.
    #[serde(default)]
    pub mine: bool,
}

/// Task list response
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    /// Tasks visible to the requester, newest first
    pub tasks: Vec<Task>,

    /// Number of tasks returned
    pub total: usize,
}

/// Create a new task
///
/// The task is owned by the authenticated requester.
///
/// # Endpoint
///
/// ```text
/// POST /v1/tasks
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "title": "Write report",
///   "description": "Q3 summary",
///   "priority": "high"
/// }
/// ```
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate().map_err(validation_error)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            owner_id: auth.user_id,
            title: req.title,
            description: req.description,
            status: req.status.unwrap_or_default(),
            priority: req.priority.unwrap_or_default(),
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, owner_id = %task.owner_id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// List tasks visible to the requester
///
/// Regular users see only their own tasks. Admins see all tasks unless they
/// pass `?mine=true`.
///
/// # Endpoint
///
/// ```text
/// GET /v1/tasks?mine=true
/// Authorization: Bearer <token>
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    let tasks = match task_list_scope(&auth, query.mine) {
        TaskScope::All => Task::list_all(&state.db).await?,
        TaskScope::OwnedBy(owner_id) => Task::list_by_owner(&state.db, owner_id).await?,
    };

    let total = tasks.len();

    Ok(Json(TaskListResponse { tasks, total }))
}

/// Fetch a single task
///
/// # Errors
///
/// - `404 Not Found`: No task with this ID
/// - `403 Forbidden`: Requester is neither the owner nor an admin
pub async fn get_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    authorize_task_access(&auth, task.owner_id)?;

    Ok(Json(task))
}

/// Update a task's mutable fields
///
/// Absent fields are left unchanged. Existence is checked before
/// authorization, so probing a missing task returns 404 even to a
/// non-owner.
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(validation_error)?;

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    authorize_task_access(&auth, task.owner_id)?;

    let updated = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
        },
    )
    .await?
    // Deleted between the check and the write
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::info!(task_id = %updated.id, "Task updated");

    Ok(Json(updated))
}

/// Delete a task permanently
///
/// Returns 204 with no body on success.
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    authorize_task_access(&auth, task.owner_id)?;

    Task::delete(&state.db, id).await?;

    tracing::info!(task_id = %id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_rejects_empty_title() {
        let req = CreateTaskRequest {
            title: "".to_string(),
            description: None,
            status: None,
            priority: None,
        };

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_create_request_defaults() {
        let req: CreateTaskRequest =
            serde_json::from_str(r#"{"title": "Buy milk"}"#).unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.status.unwrap_or_default(), TaskStatus::Pending);
        assert_eq!(req.priority.unwrap_or_default(), TaskPriority::Medium);
    }

    #[test]
    fn test_create_request_rejects_unknown_status() {
        let result: Result<CreateTaskRequest, _> =
            serde_json::from_str(r#"{"title": "x", "status": "done"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_all_optional() {
        let req: UpdateTaskRequest = serde_json::from_str("{}").unwrap();

        assert!(req.validate().is_ok());
        assert!(req.title.is_none());
        assert!(req.status.is_none());
    }

    #[test]
    fn test_list_query_mine_defaults_to_false() {
        let query: ListTasksQuery = serde_json::from_str("{}").unwrap();
        assert!(!query.mine);

        let query: ListTasksQuery = serde_json::from_str(r#"{"mine": true}"#).unwrap();
        assert!(query.mine);
    }
}
