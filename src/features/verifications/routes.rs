use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::verifications::handlers::verification_handler::{
    create_installation, create_verification, list_establishment_verifications,
    list_installations, list_verifications, update_verification,
};
use crate::features::verifications::services::VerificationService;

pub fn routes(service: Arc<VerificationService>) -> Router {
    Router::new()
        .route(
            "/api/technical-installations",
            get(list_installations).post(create_installation),
        )
        .route(
            "/api/verifications",
            get(list_verifications).post(create_verification),
        )
        .route("/api/verifications/{id}", patch(update_verification))
        .route(
            "/api/establishments/{id}/verifications",
            get(list_establishment_verifications),
        )
        .with_state(service)
}
