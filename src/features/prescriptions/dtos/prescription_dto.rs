use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::commissions::models::CommissionCategory;
use crate::features::establishments::dtos::EstablishmentSummaryDto;
use crate::features::prescriptions::models::{
    PrescriptionRow, PrescriptionSource, PrescriptionStatus,
};
use crate::shared::types::BadgeVariant;

/// The commission a prescription was issued by
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommissionRefDto {
    pub id: Uuid,
    pub date: NaiveDate,
    pub category: CommissionCategory,
    pub category_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrescriptionResponseDto {
    pub id: Uuid,
    pub establishment: EstablishmentSummaryDto,
    pub commission: Option<CommissionRefDto>,
    pub description: String,
    pub status: PrescriptionStatus,
    pub status_label: String,
    pub status_badge: BadgeVariant,
    pub source: PrescriptionSource,
    pub source_label: String,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PrescriptionRow> for PrescriptionResponseDto {
    fn from(row: PrescriptionRow) -> Self {
        let p = row.prescription;
        let commission = match (p.commission_id, row.commission_date, row.commission_category) {
            (Some(id), Some(date), Some(category)) => Some(CommissionRefDto {
                id,
                date,
                category_label: category.label().to_string(),
                category,
            }),
            _ => None,
        };

        Self {
            id: p.id,
            establishment: EstablishmentSummaryDto::with_address(
                p.establishment_id,
                row.establishment_name,
                row.establishment_address,
            ),
            commission,
            description: p.description,
            status_label: p.status.label().to_string(),
            status_badge: p.status.badge(),
            status: p.status,
            source_label: p.source.label().to_string(),
            source: p.source,
            due_date: p.due_date,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePrescriptionDto {
    pub establishment_id: Uuid,
    pub commission_id: Option<Uuid>,
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: String,
    pub status: Option<PrescriptionStatus>,
    pub source: Option<PrescriptionSource>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePrescriptionDto {
    pub commission_id: Option<Uuid>,
    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: Option<String>,
    pub status: Option<PrescriptionStatus>,
    pub source: Option<PrescriptionSource>,
    pub due_date: Option<NaiveDate>,
}
