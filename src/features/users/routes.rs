use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::features::users::handlers::activity_log_handler::{
    create_activity_log, list_activity_logs,
};
use crate::features::users::handlers::user_handler::{
    create_user, grant_access, list_consultants, list_task_assignees, list_users, revoke_access,
    update_user,
};
use crate::features::users::services::{ActivityLogService, UserService};

/// State for user and activity log handlers
#[derive(Clone)]
pub struct UserState {
    pub users: Arc<UserService>,
    pub activity: Arc<ActivityLogService>,
}

pub fn routes(users: Arc<UserService>, activity: Arc<ActivityLogService>) -> Router {
    let state = UserState { users, activity };

    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/{id}", patch(update_user))
        .route("/api/users/{id}/establishments", post(grant_access))
        .route(
            "/api/users/{id}/establishments/{establishment_id}",
            delete(revoke_access),
        )
        .route("/api/consultants", get(list_consultants))
        .route("/api/task-assignees", get(list_task_assignees))
        .route(
            "/api/activity-logs",
            get(list_activity_logs).post(create_activity_log),
        )
        .with_state(state)
}
