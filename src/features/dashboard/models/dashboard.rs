use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::commissions::models::{CommissionKind, CommissionType};
use crate::features::visits::models::VisitType;

/// Headline counters, read in one round trip
#[derive(Debug, Clone, FromRow)]
pub struct DashboardCounts {
    pub establishments: i64,
    pub upcoming_visits: i64,
    pub prescriptions_to_correct: i64,
    pub regulatory_files_in_progress: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct UpcomingVisitRow {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub establishment_name: String,
    pub scheduled_date: DateTime<Utc>,
    pub visit_type: VisitType,
}

#[derive(Debug, Clone, FromRow)]
pub struct UrgentPrescriptionRow {
    pub id: Uuid,
    pub number: i32,
    pub description: String,
    pub commission_id: Uuid,
    pub commission_kind: CommissionKind,
    pub commission_date: NaiveDate,
    pub commission_type: CommissionType,
    pub establishment_id: Uuid,
    pub establishment_name: String,
}
