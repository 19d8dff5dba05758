use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::dashboard::dtos::{DashboardStatsDto, UpcomingVisitDto, UrgentPrescriptionDto};
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::ApiResponse;

/// Headline counters
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Dashboard counters", body = ApiResponse<DashboardStatsDto>)
    ),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
pub async fn get_stats(
    _user: AuthenticatedUser,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<DashboardStatsDto>>> {
    let stats = service.stats().await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

/// The next three visits
#[utoipa::path(
    get,
    path = "/api/dashboard/upcoming-visits",
    responses(
        (status = 200, description = "Upcoming visits", body = ApiResponse<Vec<UpcomingVisitDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
pub async fn get_upcoming_visits(
    _user: AuthenticatedUser,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<Vec<UpcomingVisitDto>>>> {
    let visits = service.upcoming_visits().await?;
    Ok(Json(ApiResponse::list(visits)))
}

/// The five most recent urgent commission prescriptions
#[utoipa::path(
    get,
    path = "/api/dashboard/urgent-prescriptions",
    responses(
        (status = 200, description = "Urgent prescriptions", body = ApiResponse<Vec<UrgentPrescriptionDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "dashboard"
)]
pub async fn get_urgent_prescriptions(
    _user: AuthenticatedUser,
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<ApiResponse<Vec<UrgentPrescriptionDto>>>> {
    let prescriptions = service.urgent_prescriptions().await?;
    Ok(Json(ApiResponse::list(prescriptions)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum_test::TestServer;

    use crate::features::dashboard::{routes, DashboardService};
    use crate::shared::test_helpers::lazy_pool;

    #[tokio::test]
    async fn test_dashboard_requires_authentication() {
        let server = TestServer::new(routes(Arc::new(DashboardService::new(lazy_pool())))).unwrap();
        server.get("/api/dashboard/stats").await.assert_status_unauthorized();
        server
            .get("/api/dashboard/urgent-prescriptions")
            .await
            .assert_status_unauthorized();
    }
}
