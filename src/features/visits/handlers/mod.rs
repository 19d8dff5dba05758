pub mod visit_handler;
pub mod visit_report_handler;
