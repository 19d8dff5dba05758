use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::groupings::dtos::{GroupingDetailDto, GroupingResponseDto};
use crate::features::groupings::services::GroupingService;
use crate::shared::types::ApiResponse;

/// Groupings by name with their establishments
#[utoipa::path(
    get,
    path = "/api/groupings",
    responses(
        (status = 200, description = "Groupings", body = ApiResponse<Vec<GroupingResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "groupings"
)]
pub async fn list_groupings(
    _user: AuthenticatedUser,
    State(service): State<Arc<GroupingService>>,
) -> Result<Json<ApiResponse<Vec<GroupingResponseDto>>>> {
    let groupings = service.list().await?;
    Ok(Json(ApiResponse::list(groupings)))
}

/// A grouping with its establishments and their visits
#[utoipa::path(
    get,
    path = "/api/groupings/{id}",
    params(("id" = Uuid, Path, description = "Grouping ID")),
    responses(
        (status = 200, description = "Grouping", body = ApiResponse<GroupingDetailDto>),
        (status = 404, description = "Grouping not found")
    ),
    security(("bearer_auth" = [])),
    tag = "groupings"
)]
pub async fn get_grouping(
    _user: AuthenticatedUser,
    State(service): State<Arc<GroupingService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<GroupingDetailDto>>> {
    let grouping = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(grouping), None, None)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::TestServer;

    use crate::features::groupings::{routes, GroupingService};
    use crate::shared::test_helpers::{lazy_pool, user_with_roles, with_user};

    #[tokio::test]
    async fn test_groupings_require_authentication() {
        let server = TestServer::new(routes(Arc::new(GroupingService::new(lazy_pool())))).unwrap();
        server.get("/api/groupings").await.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_malformed_grouping_id_is_rejected() {
        let app = routes(Arc::new(GroupingService::new(lazy_pool())));
        let server = TestServer::new(with_user(app, user_with_roles(&["client"]))).unwrap();
        let response = server.get("/api/groupings/not-a-uuid").await;
        assert!(response.status_code().is_client_error());
    }
}
