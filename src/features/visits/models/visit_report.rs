use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata of a generated visit report PDF
#[derive(Debug, Clone, FromRow)]
pub struct VisitReport {
    pub id: Uuid,
    pub visit_id: Uuid,
    pub establishment_id: Uuid,
    pub consultant_id: String,
    pub report_url: String,
    pub report_date: DateTime<Utc>,
    pub report_type: String,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

/// Consultant details printed on the report
#[derive(Debug, Clone, FromRow)]
pub struct ConsultantInfo {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}
