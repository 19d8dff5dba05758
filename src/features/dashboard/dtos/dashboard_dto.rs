use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::commissions::models::{CommissionKind, CommissionType};
use crate::features::dashboard::models::{DashboardCounts, UpcomingVisitRow, UrgentPrescriptionRow};
use crate::features::establishments::dtos::EstablishmentSummaryDto;
use crate::features::visits::models::VisitType;
use crate::shared::types::BadgeVariant;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStatsDto {
    pub establishments_count: i64,
    pub upcoming_visits_count: i64,
    /// Commission prescriptions still to correct, both kinds
    pub prescriptions_to_correct_count: i64,
    pub regulatory_files_in_progress_count: i64,
}

impl From<DashboardCounts> for DashboardStatsDto {
    fn from(c: DashboardCounts) -> Self {
        Self {
            establishments_count: c.establishments,
            upcoming_visits_count: c.upcoming_visits,
            prescriptions_to_correct_count: c.prescriptions_to_correct,
            regulatory_files_in_progress_count: c.regulatory_files_in_progress,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpcomingVisitDto {
    pub id: Uuid,
    pub establishment: EstablishmentSummaryDto,
    pub scheduled_date: DateTime<Utc>,
    pub visit_type: VisitType,
    pub visit_type_label: String,
    pub visit_type_badge: BadgeVariant,
}

impl From<UpcomingVisitRow> for UpcomingVisitDto {
    fn from(row: UpcomingVisitRow) -> Self {
        Self {
            id: row.id,
            establishment: EstablishmentSummaryDto::new(row.establishment_id, row.establishment_name),
            scheduled_date: row.scheduled_date,
            visit_type_label: row.visit_type.label().to_string(),
            visit_type_badge: row.visit_type.badge(),
            visit_type: row.visit_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UrgentPrescriptionDto {
    pub id: Uuid,
    pub number: i32,
    pub description: String,
    pub commission_id: Uuid,
    pub commission_kind: CommissionKind,
    pub commission_date: NaiveDate,
    pub commission_type: CommissionType,
    pub commission_type_label: String,
    pub establishment: EstablishmentSummaryDto,
}

impl From<UrgentPrescriptionRow> for UrgentPrescriptionDto {
    fn from(row: UrgentPrescriptionRow) -> Self {
        Self {
            id: row.id,
            number: row.number,
            description: row.description,
            commission_id: row.commission_id,
            commission_kind: row.commission_kind,
            commission_date: row.commission_date,
            commission_type_label: row.commission_type.label().to_string(),
            commission_type: row.commission_type,
            establishment: EstablishmentSummaryDto::new(row.establishment_id, row.establishment_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upcoming_visit_carries_establishment_name() {
        let establishment_id = Uuid::new_v4();
        let dto = UpcomingVisitDto::from(UpcomingVisitRow {
            id: Uuid::new_v4(),
            establishment_id,
            establishment_name: "Médiathèque François Mitterrand".to_string(),
            scheduled_date: Utc::now(),
            visit_type: VisitType::SecondVisit,
        });

        assert_eq!(dto.establishment.id, establishment_id);
        assert_eq!(dto.establishment.name, "Médiathèque François Mitterrand");
        assert_eq!(dto.visit_type_label, "Seconde visite");
        assert_eq!(dto.visit_type_badge, BadgeVariant::Secondary);
    }
}
