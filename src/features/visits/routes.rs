use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::visits::handlers::visit_handler::{
    create_visit, delete_visit, list_establishment_visits, list_visits, update_visit,
};
use crate::features::visits::handlers::visit_report_handler::{
    generate_visit_report, list_visit_reports,
};
use crate::features::visits::services::{VisitReportService, VisitService};

#[derive(Clone)]
pub struct VisitState {
    pub visits: Arc<VisitService>,
    pub reports: Arc<VisitReportService>,
}

pub fn routes(visits: Arc<VisitService>, reports: Arc<VisitReportService>) -> Router {
    let state = VisitState { visits, reports };

    Router::new()
        .route("/api/visits", get(list_visits).post(create_visit))
        .route("/api/visits/{id}", patch(update_visit).delete(delete_visit))
        .route("/api/visits/{id}/report", post(generate_visit_report))
        .route("/api/visits/{id}/reports", get(list_visit_reports))
        .route(
            "/api/establishments/{id}/visits",
            get(list_establishment_visits),
        )
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;

    use axum_test::TestServer;

    use super::*;
    use crate::core::config::ReportConfig;
    use crate::features::visits::report::PdfRenderer;
    use crate::modules::storage::MemoryStore;
    use crate::shared::test_helpers::{lazy_pool, user_with_roles, with_user};

    /// Visit routes over a lazy pool and an in-memory store
    pub fn server_as(roles: &[&str]) -> TestServer {
        let pool = lazy_pool();
        let renderer = PdfRenderer::new(&ReportConfig {
            fonts_dir: PathBuf::from("./fonts"),
            font_family: "Roboto".to_string(),
        });
        let reports = VisitReportService::new(
            pool.clone(),
            Arc::new(MemoryStore::default()),
            Arc::new(renderer),
        );
        let app = routes(Arc::new(VisitService::new(pool)), Arc::new(reports));
        TestServer::new(with_user(app, user_with_roles(roles))).unwrap()
    }
}
