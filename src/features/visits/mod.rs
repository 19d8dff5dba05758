//! Site visits and the generated visit report.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod report;
pub mod routes;
pub mod services;

pub use report::PdfRenderer;
pub use routes::routes;
pub use services::{VisitReportService, VisitService};
