mod visit_report_service;
mod visit_service;

pub use visit_report_service::VisitReportService;
pub use visit_service::VisitService;
