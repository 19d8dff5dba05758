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
use crate::features::prescriptions::dtos::{
    CreatePrescriptionDto, PrescriptionResponseDto, UpdatePrescriptionDto,
};
use crate::features::prescriptions::filters::PrescriptionFilter;
use crate::features::prescriptions::services::PrescriptionService;
use crate::shared::types::ApiResponse;

/// List corrective actions by due date
#[utoipa::path(
    get,
    path = "/api/prescriptions",
    params(
        ("search" = Option<String>, Query, description = "Description or establishment name"),
        ("status" = Option<String>, Query, description = "Prescription status, or 'all'"),
        ("startDate" = Option<String>, Query, description = "Inclusive due date lower bound"),
        ("endDate" = Option<String>, Query, description = "Inclusive due date upper bound")
    ),
    responses(
        (status = 200, description = "Prescriptions", body = ApiResponse<Vec<PrescriptionResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "prescriptions"
)]
pub async fn list_prescriptions(
    _user: AuthenticatedUser,
    State(service): State<Arc<PrescriptionService>>,
    Query(filter): Query<PrescriptionFilter>,
) -> Result<Json<ApiResponse<Vec<PrescriptionResponseDto>>>> {
    let prescriptions = service.list().await?;
    Ok(Json(ApiResponse::list(filter.apply(prescriptions))))
}

/// List one establishment's corrective actions
#[utoipa::path(
    get,
    path = "/api/establishments/{id}/prescriptions",
    params(("id" = Uuid, Path, description = "Establishment ID")),
    responses(
        (status = 200, description = "Prescriptions", body = ApiResponse<Vec<PrescriptionResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "prescriptions"
)]
pub async fn list_establishment_prescriptions(
    _user: AuthenticatedUser,
    State(service): State<Arc<PrescriptionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<PrescriptionResponseDto>>>> {
    let prescriptions = service.list_by_establishment(id).await?;
    Ok(Json(ApiResponse::list(prescriptions)))
}

/// Create a corrective action
#[utoipa::path(
    post,
    path = "/api/prescriptions",
    request_body = CreatePrescriptionDto,
    responses(
        (status = 200, description = "Prescription created", body = ApiResponse<PrescriptionResponseDto>),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "prescriptions"
)]
pub async fn create_prescription(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<PrescriptionService>>,
    ValidatedJson(dto): ValidatedJson<CreatePrescriptionDto>,
) -> Result<Json<ApiResponse<PrescriptionResponseDto>>> {
    let prescription = service.create(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(prescription),
        Some("Prescription created".to_string()),
        None,
    )))
}

/// Partially update a corrective action
#[utoipa::path(
    patch,
    path = "/api/prescriptions/{id}",
    params(("id" = Uuid, Path, description = "Prescription ID")),
    request_body = UpdatePrescriptionDto,
    responses(
        (status = 200, description = "Prescription updated", body = ApiResponse<PrescriptionResponseDto>),
        (status = 404, description = "Prescription not found")
    ),
    security(("bearer_auth" = [])),
    tag = "prescriptions"
)]
pub async fn update_prescription(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<PrescriptionService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdatePrescriptionDto>,
) -> Result<Json<ApiResponse<PrescriptionResponseDto>>> {
    let prescription = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(prescription),
        Some("Prescription updated".to_string()),
        None,
    )))
}

/// Delete a corrective action
#[utoipa::path(
    delete,
    path = "/api/prescriptions/{id}",
    params(("id" = Uuid, Path, description = "Prescription ID")),
    responses(
        (status = 200, description = "Prescription deleted"),
        (status = 404, description = "Prescription not found")
    ),
    security(("bearer_auth" = [])),
    tag = "prescriptions"
)]
pub async fn delete_prescription(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<PrescriptionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Prescription deleted".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::prescriptions::{routes, PrescriptionService};
    use crate::shared::test_helpers::{lazy_pool, user_with_roles, with_user};
    use axum_test::TestServer;
    use std::sync::Arc;

    fn server(roles: &[&str]) -> TestServer {
        let app = routes(Arc::new(PrescriptionService::new(lazy_pool())));
        TestServer::new(with_user(app, user_with_roles(roles))).unwrap()
    }

    #[tokio::test]
    async fn test_clients_cannot_create() {
        server(&["client"])
            .post("/api/prescriptions")
            .json(&serde_json::json!({
                "establishment_id": "0d8f7c1e-4b7a-4f32-9a55-2c3b1e0f6a77",
                "description": "Vérifier le désenfumage"
            }))
            .await
            .assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_empty_description_is_rejected() {
        server(&["consultant"])
            .post("/api/prescriptions")
            .json(&serde_json::json!({
                "establishment_id": "0d8f7c1e-4b7a-4f32-9a55-2c3b1e0f6a77",
                "description": ""
            }))
            .await
            .assert_status_bad_request();
    }
}
