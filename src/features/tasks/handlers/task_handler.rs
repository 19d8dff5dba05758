use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::auth::guards::RequireStaff;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::tasks::dtos::{CreateTaskDto, TaskBoardDto, TaskResponseDto, UpdateTaskDto};
use crate::features::tasks::filters::TaskFilter;
use crate::features::tasks::services::TaskService;
use crate::shared::types::ApiResponse;

/// List tasks by due date, narrowed by the filter bar
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(
        ("search" = Option<String>, Query, description = "Title, description or establishment name"),
        ("priority" = Option<String>, Query, description = "p1, p2, p3 or 'all'"),
        ("status" = Option<String>, Query, description = "Task status, or 'all'"),
        ("assignee" = Option<String>, Query, description = "Assignee user ID, or 'all'"),
        ("establishment" = Option<String>, Query, description = "Accepted for compatibility; not applied")
    ),
    responses(
        (status = 200, description = "Tasks", body = ApiResponse<Vec<TaskResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "tasks"
)]
pub async fn list_tasks(
    _user: AuthenticatedUser,
    State(service): State<Arc<TaskService>>,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<ApiResponse<Vec<TaskResponseDto>>>> {
    let tasks = service.list().await?;
    Ok(Json(ApiResponse::list(filter.apply(tasks))))
}

/// Filtered tasks grouped into kanban columns
#[utoipa::path(
    get,
    path = "/api/tasks/board",
    params(
        ("search" = Option<String>, Query, description = "Title, description or establishment name"),
        ("priority" = Option<String>, Query, description = "p1, p2, p3 or 'all'"),
        ("assignee" = Option<String>, Query, description = "Assignee user ID, or 'all'")
    ),
    responses(
        (status = 200, description = "Task board", body = ApiResponse<TaskBoardDto>)
    ),
    security(("bearer_auth" = [])),
    tag = "tasks"
)]
pub async fn get_task_board(
    _user: AuthenticatedUser,
    State(service): State<Arc<TaskService>>,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<ApiResponse<TaskBoardDto>>> {
    let tasks = filter.apply(service.list().await?);
    Ok(Json(ApiResponse::success(
        Some(TaskBoardDto::from_tasks(tasks)),
        None,
        None,
    )))
}

/// List one establishment's tasks
#[utoipa::path(
    get,
    path = "/api/establishments/{id}/tasks",
    params(("id" = Uuid, Path, description = "Establishment ID")),
    responses(
        (status = 200, description = "Tasks", body = ApiResponse<Vec<TaskResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "tasks"
)]
pub async fn list_establishment_tasks(
    _user: AuthenticatedUser,
    State(service): State<Arc<TaskService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<TaskResponseDto>>>> {
    let tasks = service.list_by_establishment(id).await?;
    Ok(Json(ApiResponse::list(tasks)))
}

/// Create a task with at least one assignee
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskDto,
    responses(
        (status = 200, description = "Task created", body = ApiResponse<TaskResponseDto>),
        (status = 400, description = "Validation error or unknown assignee")
    ),
    security(("bearer_auth" = [])),
    tag = "tasks"
)]
pub async fn create_task(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<TaskService>>,
    ValidatedJson(dto): ValidatedJson<CreateTaskDto>,
) -> Result<Json<ApiResponse<TaskResponseDto>>> {
    let task = service.create(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(task),
        Some("Task created".to_string()),
        None,
    )))
}

/// Partially update a task; `assignee_ids` replaces the assignee set
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = UpdateTaskDto,
    responses(
        (status = 200, description = "Task updated", body = ApiResponse<TaskResponseDto>),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "tasks"
)]
pub async fn update_task(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<TaskService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateTaskDto>,
) -> Result<Json<ApiResponse<TaskResponseDto>>> {
    let task = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(task),
        Some("Task updated".to_string()),
        None,
    )))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "tasks"
)]
pub async fn delete_task(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<TaskService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Task deleted".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::tasks::{routes, TaskService};
    use crate::shared::test_helpers::{lazy_pool, user_with_roles, with_user};
    use axum_test::TestServer;
    use std::sync::Arc;

    fn server(roles: &[&str]) -> TestServer {
        let app = routes(Arc::new(TaskService::new(lazy_pool())));
        TestServer::new(with_user(app, user_with_roles(roles))).unwrap()
    }

    #[tokio::test]
    async fn test_task_without_assignee_is_rejected() {
        server(&["consultant"])
            .post("/api/tasks")
            .json(&serde_json::json!({ "title": "Relancer le client", "assignee_ids": [] }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_emptying_assignees_is_rejected() {
        server(&["consultant"])
            .patch("/api/tasks/2a7c1f0e-5d3b-4e8a-9c6f-1b2d3e4f5a6b")
            .json(&serde_json::json!({ "assignee_ids": [] }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_clients_cannot_delete_tasks() {
        server(&["client"])
            .delete("/api/tasks/2a7c1f0e-5d3b-4e8a-9c6f-1b2d3e4f5a6b")
            .await
            .assert_status_forbidden();
    }
}
