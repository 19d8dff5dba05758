use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::groupings::handlers::grouping_handler::{get_grouping, list_groupings};
use crate::features::groupings::services::GroupingService;

pub fn routes(service: Arc<GroupingService>) -> Router {
    Router::new()
        .route("/api/groupings", get(list_groupings))
        .route("/api/groupings/{id}", get(get_grouping))
        .with_state(service)
}
