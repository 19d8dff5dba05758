use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ValidatedJson;
use crate::features::auth::guards::RequireStaff;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::establishments::dtos::{
    ContactResponseDto, CreateEstablishmentDto, EstablishmentDetailDto, EstablishmentOverviewDto,
    EstablishmentResponseDto, UpdateEstablishmentDto,
};
use crate::features::establishments::routes::EstablishmentState;
use crate::shared::types::ApiResponse;

/// List establishments, ordered by name
#[utoipa::path(
    get,
    path = "/api/establishments",
    responses(
        (status = 200, description = "Establishments visible to the caller", body = ApiResponse<Vec<EstablishmentResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "establishments"
)]
pub async fn list_establishments(
    user: AuthenticatedUser,
    State(state): State<EstablishmentState>,
) -> Result<Json<ApiResponse<Vec<EstablishmentResponseDto>>>> {
    let establishments = state.establishments.list(&user).await?;
    let dtos = establishments.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::list(dtos)))
}

/// Get an establishment with its grouping
#[utoipa::path(
    get,
    path = "/api/establishments/{id}",
    params(("id" = Uuid, Path, description = "Establishment ID")),
    responses(
        (status = 200, description = "Establishment found", body = ApiResponse<EstablishmentDetailDto>),
        (status = 404, description = "Establishment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "establishments"
)]
pub async fn get_establishment(
    user: AuthenticatedUser,
    State(state): State<EstablishmentState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EstablishmentDetailDto>>> {
    state.establishments.ensure_access(&user, id).await?;
    let establishment = state.establishments.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(establishment.into()), None, None)))
}

/// Create an establishment
#[utoipa::path(
    post,
    path = "/api/establishments",
    request_body = CreateEstablishmentDto,
    responses(
        (status = 200, description = "Establishment created", body = ApiResponse<EstablishmentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Staff access required")
    ),
    security(("bearer_auth" = [])),
    tag = "establishments"
)]
pub async fn create_establishment(
    RequireStaff(_staff): RequireStaff,
    State(state): State<EstablishmentState>,
    ValidatedJson(dto): ValidatedJson<CreateEstablishmentDto>,
) -> Result<Json<ApiResponse<EstablishmentResponseDto>>> {
    let establishment = state.establishments.create(dto.into()).await?;
    Ok(Json(ApiResponse::success(
        Some(establishment.into()),
        Some("Establishment created".to_string()),
        None,
    )))
}

/// Partially update an establishment
#[utoipa::path(
    patch,
    path = "/api/establishments/{id}",
    params(("id" = Uuid, Path, description = "Establishment ID")),
    request_body = UpdateEstablishmentDto,
    responses(
        (status = 200, description = "Establishment updated", body = ApiResponse<EstablishmentDetailDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Establishment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "establishments"
)]
pub async fn update_establishment(
    RequireStaff(_staff): RequireStaff,
    State(state): State<EstablishmentState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateEstablishmentDto>,
) -> Result<Json<ApiResponse<EstablishmentDetailDto>>> {
    let establishment = state.establishments.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(establishment.into()),
        Some("Establishment updated".to_string()),
        None,
    )))
}

/// List an establishment's contacts, ordered by name
#[utoipa::path(
    get,
    path = "/api/establishments/{id}/contacts",
    params(("id" = Uuid, Path, description = "Establishment ID")),
    responses(
        (status = 200, description = "Contacts", body = ApiResponse<Vec<ContactResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "establishments"
)]
pub async fn list_contacts(
    user: AuthenticatedUser,
    State(state): State<EstablishmentState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ContactResponseDto>>>> {
    state.establishments.ensure_access(&user, id).await?;
    let contacts = state.establishments.list_contacts(id).await?;
    Ok(Json(ApiResponse::list(
        contacts.into_iter().map(Into::into).collect(),
    )))
}

/// Everything the establishment detail page shows, in one response
#[utoipa::path(
    get,
    path = "/api/establishments/{id}/overview",
    params(("id" = Uuid, Path, description = "Establishment ID")),
    responses(
        (status = 200, description = "Establishment overview", body = ApiResponse<EstablishmentOverviewDto>),
        (status = 404, description = "Establishment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "establishments"
)]
pub async fn get_overview(
    user: AuthenticatedUser,
    State(state): State<EstablishmentState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EstablishmentOverviewDto>>> {
    state.establishments.ensure_access(&user, id).await?;
    let overview = state.overview.get(id).await?;
    Ok(Json(ApiResponse::success(Some(overview), None, None)))
}
