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
use crate::features::regulatory_files::dtos::{
    CreateRegulatoryFileDto, RegulatoryFileResponseDto, UpdateRegulatoryFileDto,
};
use crate::features::regulatory_files::filters::RegulatoryFileFilter;
use crate::features::regulatory_files::services::RegulatoryFileService;
use crate::shared::types::ApiResponse;

/// List regulatory files, most recent submission first
#[utoipa::path(
    get,
    path = "/api/regulatory-files",
    params(
        ("search" = Option<String>, Query, description = "File number or establishment name"),
        ("status" = Option<String>, Query, description = "File status, or 'all'"),
        ("startDate" = Option<String>, Query, description = "Inclusive submission date lower bound"),
        ("endDate" = Option<String>, Query, description = "Inclusive submission date upper bound")
    ),
    responses(
        (status = 200, description = "Regulatory files", body = ApiResponse<Vec<RegulatoryFileResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "regulatory-files"
)]
pub async fn list_regulatory_files(
    _user: AuthenticatedUser,
    State(service): State<Arc<RegulatoryFileService>>,
    Query(filter): Query<RegulatoryFileFilter>,
) -> Result<Json<ApiResponse<Vec<RegulatoryFileResponseDto>>>> {
    let files = service.list().await?;
    Ok(Json(ApiResponse::list(filter.apply(files))))
}

/// List an establishment's regulatory files by deadline
#[utoipa::path(
    get,
    path = "/api/establishments/{id}/regulatory-files",
    params(("id" = Uuid, Path, description = "Establishment ID")),
    responses(
        (status = 200, description = "Regulatory files", body = ApiResponse<Vec<RegulatoryFileResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "regulatory-files"
)]
pub async fn list_establishment_regulatory_files(
    _user: AuthenticatedUser,
    State(service): State<Arc<RegulatoryFileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<RegulatoryFileResponseDto>>>> {
    let files = service.list_by_establishment(id).await?;
    Ok(Json(ApiResponse::list(files)))
}

/// Register a regulatory file
#[utoipa::path(
    post,
    path = "/api/regulatory-files",
    request_body = CreateRegulatoryFileDto,
    responses(
        (status = 200, description = "Regulatory file created", body = ApiResponse<RegulatoryFileResponseDto>),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "regulatory-files"
)]
pub async fn create_regulatory_file(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<RegulatoryFileService>>,
    ValidatedJson(dto): ValidatedJson<CreateRegulatoryFileDto>,
) -> Result<Json<ApiResponse<RegulatoryFileResponseDto>>> {
    let file = service.create(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(file),
        Some("Regulatory file created".to_string()),
        None,
    )))
}

/// Partially update a regulatory file
#[utoipa::path(
    patch,
    path = "/api/regulatory-files/{id}",
    params(("id" = Uuid, Path, description = "Regulatory file ID")),
    request_body = UpdateRegulatoryFileDto,
    responses(
        (status = 200, description = "Regulatory file updated", body = ApiResponse<RegulatoryFileResponseDto>),
        (status = 404, description = "Regulatory file not found")
    ),
    security(("bearer_auth" = [])),
    tag = "regulatory-files"
)]
pub async fn update_regulatory_file(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<RegulatoryFileService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateRegulatoryFileDto>,
) -> Result<Json<ApiResponse<RegulatoryFileResponseDto>>> {
    let file = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(file),
        Some("Regulatory file updated".to_string()),
        None,
    )))
}
