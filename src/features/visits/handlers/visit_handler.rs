use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::auth::guards::RequireStaff;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::visits::dtos::{CreateVisitDto, UpdateVisitDto, VisitResponseDto};
use crate::features::visits::routes::VisitState;
use crate::shared::types::ApiResponse;

/// All visits in calendar order
#[utoipa::path(
    get,
    path = "/api/visits",
    responses(
        (status = 200, description = "Visits", body = ApiResponse<Vec<VisitResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "visits"
)]
pub async fn list_visits(
    _user: AuthenticatedUser,
    State(state): State<VisitState>,
) -> Result<Json<ApiResponse<Vec<VisitResponseDto>>>> {
    let visits = state.visits.list().await?;
    Ok(Json(ApiResponse::list(visits)))
}

#[utoipa::path(
    get,
    path = "/api/establishments/{id}/visits",
    params(("id" = Uuid, Path, description = "Establishment ID")),
    responses(
        (status = 200, description = "Visits", body = ApiResponse<Vec<VisitResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "visits"
)]
pub async fn list_establishment_visits(
    _user: AuthenticatedUser,
    State(state): State<VisitState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<VisitResponseDto>>>> {
    let visits = state.visits.list_by_establishment(id).await?;
    Ok(Json(ApiResponse::list(visits)))
}

/// Schedule a visit
#[utoipa::path(
    post,
    path = "/api/visits",
    request_body = CreateVisitDto,
    responses(
        (status = 200, description = "Visit created", body = ApiResponse<VisitResponseDto>),
        (status = 400, description = "Validation error or unknown establishment")
    ),
    security(("bearer_auth" = [])),
    tag = "visits"
)]
pub async fn create_visit(
    RequireStaff(_staff): RequireStaff,
    State(state): State<VisitState>,
    ValidatedJson(dto): ValidatedJson<CreateVisitDto>,
) -> Result<Json<ApiResponse<VisitResponseDto>>> {
    let visit = state.visits.create(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(visit),
        Some("Visit created".to_string()),
        None,
    )))
}

#[utoipa::path(
    patch,
    path = "/api/visits/{id}",
    params(("id" = Uuid, Path, description = "Visit ID")),
    request_body = UpdateVisitDto,
    responses(
        (status = 200, description = "Visit updated", body = ApiResponse<VisitResponseDto>),
        (status = 404, description = "Visit not found")
    ),
    security(("bearer_auth" = [])),
    tag = "visits"
)]
pub async fn update_visit(
    RequireStaff(_staff): RequireStaff,
    State(state): State<VisitState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateVisitDto>,
) -> Result<Json<ApiResponse<VisitResponseDto>>> {
    let visit = state.visits.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(visit),
        Some("Visit updated".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/visits/{id}",
    params(("id" = Uuid, Path, description = "Visit ID")),
    responses(
        (status = 200, description = "Visit deleted"),
        (status = 404, description = "Visit not found")
    ),
    security(("bearer_auth" = [])),
    tag = "visits"
)]
pub async fn delete_visit(
    RequireStaff(_staff): RequireStaff,
    State(state): State<VisitState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    state.visits.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Visit deleted".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::visits::routes::tests::server_as;

    #[tokio::test]
    async fn test_client_cannot_schedule_visits() {
        let server = server_as(&["client"]);
        let response = server
            .post("/api/visits")
            .json(&serde_json::json!({
                "establishment_id": "6d1f5a0e-8f7a-4c55-9a4c-0d7c2f3b9e11",
                "scheduled_date": "2026-11-03T09:00:00Z",
                "visit_type": "reminder"
            }))
            .await;
        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_unknown_visit_type_is_rejected() {
        let server = server_as(&["consultant"]);
        let response = server
            .patch("/api/visits/6d1f5a0e-8f7a-4c55-9a4c-0d7c2f3b9e11")
            .json(&serde_json::json!({ "visit_type": "annual" }))
            .await;
        assert!(response.status_code().is_client_error());
    }
}
