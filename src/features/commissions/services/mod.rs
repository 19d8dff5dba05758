mod commission_service;

pub use commission_service::CommissionService;
