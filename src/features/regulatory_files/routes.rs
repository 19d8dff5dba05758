use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::regulatory_files::handlers::regulatory_file_handler::{
    create_regulatory_file, list_establishment_regulatory_files, list_regulatory_files,
    update_regulatory_file,
};
use crate::features::regulatory_files::services::RegulatoryFileService;

pub fn routes(service: Arc<RegulatoryFileService>) -> Router {
    Router::new()
        .route(
            "/api/regulatory-files",
            get(list_regulatory_files).post(create_regulatory_file),
        )
        .route("/api/regulatory-files/{id}", patch(update_regulatory_file))
        .route(
            "/api/establishments/{id}/regulatory-files",
            get(list_establishment_regulatory_files),
        )
        .with_state(service)
}
