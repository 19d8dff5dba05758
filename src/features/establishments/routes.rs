use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::establishments::handlers::establishment_handler::{
    create_establishment, get_establishment, get_overview, list_contacts, list_establishments,
    update_establishment,
};
use crate::features::establishments::services::{EstablishmentService, OverviewService};

/// State for establishment handlers
#[derive(Clone)]
pub struct EstablishmentState {
    pub establishments: Arc<EstablishmentService>,
    pub overview: Arc<OverviewService>,
}

pub fn routes(
    establishments: Arc<EstablishmentService>,
    overview: Arc<OverviewService>,
) -> Router {
    let state = EstablishmentState {
        establishments,
        overview,
    };

    Router::new()
        .route(
            "/api/establishments",
            get(list_establishments).post(create_establishment),
        )
        .route(
            "/api/establishments/{id}",
            get(get_establishment).patch(update_establishment),
        )
        .route("/api/establishments/{id}/contacts", get(list_contacts))
        .route("/api/establishments/{id}/overview", get(get_overview))
        .with_state(state)
}
