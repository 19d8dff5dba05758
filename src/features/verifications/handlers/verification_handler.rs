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
use crate::features::verifications::dtos::{
    CreateTechnicalInstallationDto, CreateVerificationDto, TechnicalInstallationDto,
    UpdateVerificationDto, VerificationResponseDto,
};
use crate::features::verifications::services::VerificationService;
use crate::shared::types::ApiResponse;

/// List technical installation types
#[utoipa::path(
    get,
    path = "/api/technical-installations",
    responses(
        (status = 200, description = "Installations ordered by name", body = ApiResponse<Vec<TechnicalInstallationDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "verifications"
)]
pub async fn list_installations(
    _user: AuthenticatedUser,
    State(service): State<Arc<VerificationService>>,
) -> Result<Json<ApiResponse<Vec<TechnicalInstallationDto>>>> {
    let installations = service.list_installations().await?;
    Ok(Json(ApiResponse::list(installations)))
}

/// Declare a technical installation type
#[utoipa::path(
    post,
    path = "/api/technical-installations",
    request_body = CreateTechnicalInstallationDto,
    responses(
        (status = 200, description = "Installation created", body = ApiResponse<TechnicalInstallationDto>),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "verifications"
)]
pub async fn create_installation(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<VerificationService>>,
    ValidatedJson(dto): ValidatedJson<CreateTechnicalInstallationDto>,
) -> Result<Json<ApiResponse<TechnicalInstallationDto>>> {
    let installation = service.create_installation(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(installation),
        Some("Installation created".to_string()),
        None,
    )))
}

/// List verifications, most recent first
#[utoipa::path(
    get,
    path = "/api/verifications",
    responses(
        (status = 200, description = "Verifications", body = ApiResponse<Vec<VerificationResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "verifications"
)]
pub async fn list_verifications(
    _user: AuthenticatedUser,
    State(service): State<Arc<VerificationService>>,
) -> Result<Json<ApiResponse<Vec<VerificationResponseDto>>>> {
    let verifications = service.list().await?;
    Ok(Json(ApiResponse::list(verifications)))
}

/// List an establishment's verifications, next due first
#[utoipa::path(
    get,
    path = "/api/establishments/{id}/verifications",
    params(("id" = Uuid, Path, description = "Establishment ID")),
    responses(
        (status = 200, description = "Verifications", body = ApiResponse<Vec<VerificationResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "verifications"
)]
pub async fn list_establishment_verifications(
    _user: AuthenticatedUser,
    State(service): State<Arc<VerificationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<VerificationResponseDto>>>> {
    let verifications = service.list_by_establishment(id).await?;
    Ok(Json(ApiResponse::list(verifications)))
}

/// Record a verification
#[utoipa::path(
    post,
    path = "/api/verifications",
    request_body = CreateVerificationDto,
    responses(
        (status = 200, description = "Verification created", body = ApiResponse<VerificationResponseDto>),
        (status = 400, description = "Validation error or unknown installation")
    ),
    security(("bearer_auth" = [])),
    tag = "verifications"
)]
pub async fn create_verification(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<VerificationService>>,
    ValidatedJson(dto): ValidatedJson<CreateVerificationDto>,
) -> Result<Json<ApiResponse<VerificationResponseDto>>> {
    let verification = service.create(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(verification),
        Some("Verification created".to_string()),
        None,
    )))
}

/// Partially update a verification
#[utoipa::path(
    patch,
    path = "/api/verifications/{id}",
    params(("id" = Uuid, Path, description = "Verification ID")),
    request_body = UpdateVerificationDto,
    responses(
        (status = 200, description = "Verification updated", body = ApiResponse<VerificationResponseDto>),
        (status = 404, description = "Verification not found")
    ),
    security(("bearer_auth" = [])),
    tag = "verifications"
)]
pub async fn update_verification(
    RequireStaff(_staff): RequireStaff,
    State(service): State<Arc<VerificationService>>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateVerificationDto>,
) -> Result<Json<ApiResponse<VerificationResponseDto>>> {
    let verification = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(verification),
        Some("Verification updated".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::verifications::{routes, VerificationService};
    use crate::shared::test_helpers::{lazy_pool, user_with_roles, with_user};
    use axum_test::TestServer;
    use std::sync::Arc;

    fn server(roles: &[&str]) -> TestServer {
        let app = routes(Arc::new(VerificationService::new(lazy_pool())));
        TestServer::new(with_user(app, user_with_roles(roles))).unwrap()
    }

    #[tokio::test]
    async fn test_period_must_be_positive() {
        server(&["admin"])
            .post("/api/technical-installations")
            .json(&serde_json::json!({
                "name": "Désenfumage",
                "regulation_type": "erp",
                "verification_period_months": 0
            }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_clients_cannot_record_verifications() {
        server(&["client"])
            .post("/api/verifications")
            .json(&serde_json::json!({
                "establishment_id": "0d8f7c1e-4b7a-4f32-9a55-2c3b1e0f6a77",
                "installation_id": "a1f0c7d2-2b6e-4c1a-8f3d-9e5b7c4a2d10",
                "verification_date": "2024-05-02",
                "provider_name": "Bureau Veritas"
            }))
            .await
            .assert_status_forbidden();
    }
}
