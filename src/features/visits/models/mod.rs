mod visit;
mod visit_report;

pub use visit::{VisitRow, VisitType};
pub use visit_report::{ConsultantInfo, VisitReport};
