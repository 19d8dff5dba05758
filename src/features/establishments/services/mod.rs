mod establishment_service;
mod overview_service;

pub use establishment_service::EstablishmentService;
pub use overview_service::OverviewService;
