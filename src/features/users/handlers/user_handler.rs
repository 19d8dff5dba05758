use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::auth::guards::{RequireAdmin, RequireStaff};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{
    CreateUserDto, GrantAccessDto, UpdateUserDto, UserOptionDto, UserResponseDto,
};
use crate::features::users::routes::UserState;
use crate::shared::types::ApiResponse;

/// List users with their establishment grants
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users ordered by name", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(
    RequireStaff(_staff): RequireStaff,
    State(state): State<UserState>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    let users = state.users.list().await?;
    Ok(Json(ApiResponse::list(users)))
}

/// Create a user and its sign-in account
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 200, description = "User created", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Email already registered"),
        (status = 502, description = "Identity provider unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<UserState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = state.users.create(&admin.sub, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(user),
        Some("User created".to_string()),
        None,
    )))
}

/// Update a user's name, phone or role
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponseDto>),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<UserState>,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = state.users.update(&admin.sub, &id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(user),
        Some("User updated".to_string()),
        None,
    )))
}

/// Grant a user access to an establishment
#[utoipa::path(
    post,
    path = "/api/users/{id}/establishments",
    params(("id" = String, Path, description = "User ID")),
    request_body = GrantAccessDto,
    responses(
        (status = 200, description = "Access granted", body = ApiResponse<UserResponseDto>),
        (status = 409, description = "Access already granted")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn grant_access(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<UserState>,
    Path(id): Path<String>,
    Json(dto): Json<GrantAccessDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = state
        .users
        .grant_access(&admin.sub, &id, dto.establishment_id)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(user),
        Some("Access granted".to_string()),
        None,
    )))
}

/// Revoke a user's access to an establishment
#[utoipa::path(
    delete,
    path = "/api/users/{id}/establishments/{establishment_id}",
    params(
        ("id" = String, Path, description = "User ID"),
        ("establishment_id" = Uuid, Path, description = "Establishment ID")
    ),
    responses(
        (status = 200, description = "Access revoked"),
        (status = 404, description = "No such grant")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn revoke_access(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<UserState>,
    Path((id, establishment_id)): Path<(String, Uuid)>,
) -> Result<Json<ApiResponse<()>>> {
    state
        .users
        .revoke_access(&admin.sub, &id, establishment_id)
        .await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Access revoked".to_string()),
        None,
    )))
}

/// Users with the consultant role
#[utoipa::path(
    get,
    path = "/api/consultants",
    responses(
        (status = 200, description = "Consultants", body = ApiResponse<Vec<UserOptionDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_consultants(
    _user: AuthenticatedUser,
    State(state): State<UserState>,
) -> Result<Json<ApiResponse<Vec<UserOptionDto>>>> {
    let consultants = state.users.list_consultants().await?;
    Ok(Json(ApiResponse::list(consultants)))
}

/// Users selectable as task assignees
#[utoipa::path(
    get,
    path = "/api/task-assignees",
    responses(
        (status = 200, description = "Assignable users", body = ApiResponse<Vec<UserOptionDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_task_assignees(
    _user: AuthenticatedUser,
    State(state): State<UserState>,
) -> Result<Json<ApiResponse<Vec<UserOptionDto>>>> {
    let assignees = state.users.list_assignees().await?;
    Ok(Json(ApiResponse::list(assignees)))
}

#[cfg(test)]
mod tests {
    use crate::core::config::IdentityAdminConfig;
    use crate::features::users::{routes, ActivityLogService, UserService};
    use crate::modules::identity::{IdentityAdminClient, TokenManager};
    use crate::shared::test_helpers::{lazy_pool, user_with_roles, with_user};
    use axum_test::TestServer;
    use std::sync::Arc;

    fn server(roles: &[&str]) -> TestServer {
        let pool = lazy_pool();
        let config = IdentityAdminConfig {
            client_id: "m2m".to_string(),
            client_secret: "secret".to_string(),
            resource: "https://default.logto.app/api".to_string(),
            scope: "all".to_string(),
            token_url: "http://identity.test/oidc/token".to_string(),
            api_base_url: "http://identity.test".to_string(),
            temporary_password: "Changeme-2024!".to_string(),
        };
        let identity = Arc::new(IdentityAdminClient::new(
            &config.api_base_url,
            Arc::new(TokenManager::new(&config)),
        ));
        let activity = Arc::new(ActivityLogService::new(pool.clone()));
        let users = Arc::new(UserService::new(
            pool,
            identity,
            activity.clone(),
            config.temporary_password,
        ));
        TestServer::new(with_user(routes(users, activity), user_with_roles(roles))).unwrap()
    }

    fn payload() -> serde_json::Value {
        serde_json::json!({
            "email": "sophie.bernard@example.fr",
            "full_name": "Sophie Bernard",
            "role": "consultant"
        })
    }

    #[tokio::test]
    async fn test_only_admins_create_users() {
        server(&["consultant"])
            .post("/api/users")
            .json(&payload())
            .await
            .assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected_before_provider_call() {
        let mut body = payload();
        body["email"] = serde_json::json!("sophie");
        server(&["admin"])
            .post("/api/users")
            .json(&body)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_clients_cannot_read_activity_logs() {
        server(&["client"])
            .get("/api/activity-logs")
            .await
            .assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_revoke_requires_uuid_establishment() {
        let response = server(&["admin"])
            .delete("/api/users/u1/establishments/not-a-uuid")
            .await;
        assert!(response.status_code().is_client_error());
    }
}
