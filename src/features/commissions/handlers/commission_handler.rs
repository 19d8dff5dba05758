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
use crate::features::commissions::dtos::{
    CommissionKindQuery, CommissionPrescriptionResponseDto, CommissionResponseDto,
    CreateCommissionDto, CreateCommissionPrescriptionDto, UpdateCommissionDto,
    UpdateCommissionPrescriptionDto,
};
use crate::features::commissions::filters::CommissionFilter;
use crate::features::commissions::services::CommissionService;
use crate::shared::types::ApiResponse;

/// List commissions of one kind, newest first, narrowed by the filter bar
#[utoipa::path(
    get,
    path = "/api/commissions",
    params(
        ("kind" = Option<String>, Query, description = "safety (default) or accessibility"),
        ("search" = Option<String>, Query, description = "Establishment or responsible name"),
        ("type" = Option<String>, Query, description = "Commission category, or 'all'"),
        ("status" = Option<String>, Query, description = "Commission status, or 'all'"),
        ("startDate" = Option<String>, Query, description = "Inclusive lower bound (YYYY-MM-DD)"),
        ("endDate" = Option<String>, Query, description = "Inclusive upper bound (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Commissions", body = ApiResponse<Vec<CommissionResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "commissions"
)]
pub async fn list_commissions(
    _user: AuthenticatedUser,
    State(service): State<Arc<CommissionService>>,
    Query(selector): Query<CommissionKindQuery>,
    Query(filter): Query<CommissionFilter>,
) -> Result<Json<ApiResponse<Vec<CommissionResponseDto>>>> {
    let commissions = service.list(selector.kind).await?;
    Ok(Json(ApiResponse::list(filter.apply(commissions))))
}

/// List one establishment's commissions of a kind
#[utoipa::path(
    get,
    path = "/api/establishments/{id}/commissions",
    params(
        ("id" = Uuid, Path, description = "Establishment ID"),
        ("kind" = Option<String>, Query, description = "safety (default) or accessibility")
    ),
    responses(
        (status = 200, description = "Commissions", body = ApiResponse<Vec<CommissionResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "commissions"
)]
pub async fn list_establishment_commissions(
    _user: AuthenticatedUser,
    State(service): State<Arc<CommissionService>>,
    Path(id): Path<Uuid>,
    Query(selector): Query<CommissionKindQuery>,
) -> Result<Json<ApiResponse<Vec<CommissionResponseDto>>>> {
    let commissions = service.list_by_establishment(id, selector.kind).await?;
    Ok(Json(ApiResponse::list(commissions)))
}

/// Get a commission with its prescriptions
#[utoipa::path(
    get,
    path = "/api/commissions/{id}",
    params(("id" = Uuid, Path, description = "Commission ID")),
    responses(
        (status = 200, description = "Commission found", body = ApiResponse<CommissionResponseDto>),
        (status = 404, description = "Commission not found")
    ),
    security(("bearer_auth" = [])),
    tag = "commissions"
)]
pub async fn get_commission(
    _user: AuthenticatedUser,
    State(service): State<Arc<CommissionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CommissionResponseDto>>> {
    let commission = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(commission), None, None)))
}

/// Create a commission
#[utoipa::path(
    post,
    path = "/api/commissions",
    request_body = CreateCommissionDto,
    responses(
        (status = 200, description = "Commission created", body = ApiResponse<CommissionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = [])),
    tag = "commissions"
)]
pub async fn create_commission(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<CommissionService>>,
    ValidatedJson(dto): ValidatedJson<CreateCommissionDto>,
) -> Result<Json<ApiResponse<CommissionResponseDto>>> {
    let commission = service.create(dto.into()).await?;
    Ok(Json(ApiResponse::success(
        Some(commission),
        Some("Commission created".to_string()),
        None,
    )))
}

/// Partially update a commission
#[utoipa::path(
    patch,
    path = "/api/commissions/{id}",
    params(("id" = Uuid, Path, description = "Commission ID")),
    request_body = UpdateCommissionDto,
    responses(
        (status = 200, description = "Commission updated", body = ApiResponse<CommissionResponseDto>),
        (status = 404, description = "Commission not found")
    ),
    security(("bearer_auth" = [])),
    tag = "commissions"
)]
pub async fn update_commission(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<CommissionService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCommissionDto>,
) -> Result<Json<ApiResponse<CommissionResponseDto>>> {
    let commission = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(commission),
        Some("Commission updated".to_string()),
        None,
    )))
}

/// Delete a commission and its prescriptions
#[utoipa::path(
    delete,
    path = "/api/commissions/{id}",
    params(("id" = Uuid, Path, description = "Commission ID")),
    responses(
        (status = 200, description = "Commission deleted"),
        (status = 404, description = "Commission not found")
    ),
    security(("bearer_auth" = [])),
    tag = "commissions"
)]
pub async fn delete_commission(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<CommissionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Commission deleted".to_string()),
        None,
    )))
}

/// Add a prescription to a commission
#[utoipa::path(
    post,
    path = "/api/commissions/{id}/prescriptions",
    params(("id" = Uuid, Path, description = "Commission ID")),
    request_body = CreateCommissionPrescriptionDto,
    responses(
        (status = 200, description = "Prescription created", body = ApiResponse<CommissionPrescriptionResponseDto>),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "commissions"
)]
pub async fn create_commission_prescription(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<CommissionService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateCommissionPrescriptionDto>,
) -> Result<Json<ApiResponse<CommissionPrescriptionResponseDto>>> {
    let prescription = service.create_prescription(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(prescription),
        Some("Prescription created".to_string()),
        None,
    )))
}

/// Partially update a commission prescription
#[utoipa::path(
    patch,
    path = "/api/commission-prescriptions/{id}",
    params(("id" = Uuid, Path, description = "Prescription ID")),
    request_body = UpdateCommissionPrescriptionDto,
    responses(
        (status = 200, description = "Prescription updated", body = ApiResponse<CommissionPrescriptionResponseDto>),
        (status = 404, description = "Prescription not found")
    ),
    security(("bearer_auth" = [])),
    tag = "commissions"
)]
pub async fn update_commission_prescription(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<CommissionService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCommissionPrescriptionDto>,
) -> Result<Json<ApiResponse<CommissionPrescriptionResponseDto>>> {
    let prescription = service.update_prescription(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(prescription),
        Some("Prescription updated".to_string()),
        None,
    )))
}

/// Delete a commission prescription
#[utoipa::path(
    delete,
    path = "/api/commission-prescriptions/{id}",
    params(("id" = Uuid, Path, description = "Prescription ID")),
    responses(
        (status = 200, description = "Prescription deleted"),
        (status = 404, description = "Prescription not found")
    ),
    security(("bearer_auth" = [])),
    tag = "commissions"
)]
pub async fn delete_commission_prescription(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<CommissionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_prescription(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Prescription deleted".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::commissions::{routes, CommissionService};
    use crate::shared::test_helpers::{lazy_pool, user_with_roles, with_user};
    use axum_test::TestServer;
    use std::sync::Arc;

    fn server(roles: &[&str]) -> TestServer {
        let app = routes(Arc::new(CommissionService::new(lazy_pool())));
        TestServer::new(with_user(app, user_with_roles(roles))).unwrap()
    }

    #[tokio::test]
    async fn test_clients_cannot_delete_commissions() {
        server(&["client"])
            .delete("/api/commissions/7f1c6a52-8a8f-4b7e-9a43-51f3f4c2a8e1")
            .await
            .assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_prescription_number_must_be_positive() {
        server(&["consultant"])
            .post("/api/commissions/7f1c6a52-8a8f-4b7e-9a43-51f3f4c2a8e1/prescriptions")
            .json(&serde_json::json!({ "number": 0, "description": "Issue de secours" }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_unknown_filter_value_is_rejected() {
        let response = server(&["admin"])
            .get("/api/commissions")
            .add_query_param("status", "pending")
            .await;
        assert!(response.status_code().is_client_error());
    }
}
