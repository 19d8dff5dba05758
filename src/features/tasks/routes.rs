use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::tasks::handlers::task_handler::{
    create_task, delete_task, get_task_board, list_establishment_tasks, list_tasks, update_task,
};
use crate::features::tasks::services::TaskService;

pub fn routes(service: Arc<TaskService>) -> Router {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/board", get(get_task_board))
        .route("/api/tasks/{id}", patch(update_task).delete(delete_task))
        .route(
            "/api/establishments/{id}/tasks",
            get(list_establishment_tasks),
        )
        .with_state(service)
}
