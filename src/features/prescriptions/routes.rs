use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::prescriptions::handlers::prescription_handler::{
    create_prescription, delete_prescription, list_establishment_prescriptions,
    list_prescriptions, update_prescription,
};
use crate::features::prescriptions::services::PrescriptionService;

pub fn routes(service: Arc<PrescriptionService>) -> Router {
    Router::new()
        .route(
            "/api/prescriptions",
            get(list_prescriptions).post(create_prescription),
        )
        .route(
            "/api/prescriptions/{id}",
            patch(update_prescription).delete(delete_prescription),
        )
        .route(
            "/api/establishments/{id}/prescriptions",
            get(list_establishment_prescriptions),
        )
        .with_state(service)
}
