use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::commissions::handlers::commission_handler::{
    create_commission, create_commission_prescription, delete_commission,
    delete_commission_prescription, get_commission, list_commissions,
    list_establishment_commissions, update_commission, update_commission_prescription,
};
use crate::features::commissions::services::CommissionService;

pub fn routes(service: Arc<CommissionService>) -> Router {
    Router::new()
        .route(
            "/api/commissions",
            get(list_commissions).post(create_commission),
        )
        .route(
            "/api/commissions/{id}",
            get(get_commission)
                .patch(update_commission)
                .delete(delete_commission),
        )
        .route(
            "/api/commissions/{id}/prescriptions",
            post(create_commission_prescription),
        )
        .route(
            "/api/commission-prescriptions/{id}",
            patch(update_commission_prescription).delete(delete_commission_prescription),
        )
        .route(
            "/api/establishments/{id}/commissions",
            get(list_establishment_commissions),
        )
        .with_state(service)
}
