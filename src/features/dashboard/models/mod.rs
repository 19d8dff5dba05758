mod dashboard;

pub use dashboard::{DashboardCounts, UpcomingVisitRow, UrgentPrescriptionRow};
