use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::dashboard::handlers::dashboard_handler::{
    get_stats, get_upcoming_visits, get_urgent_prescriptions,
};
use crate::features::dashboard::services::DashboardService;

pub fn routes(service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/dashboard/stats", get(get_stats))
        .route("/api/dashboard/upcoming-visits", get(get_upcoming_visits))
        .route(
            "/api/dashboard/urgent-prescriptions",
            get(get_urgent_prescriptions),
        )
        .with_state(service)
}
