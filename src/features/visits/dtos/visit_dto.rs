use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::establishments::dtos::EstablishmentSummaryDto;
use crate::features::users::dtos::UserSummaryDto;
use crate::features::visits::models::{VisitRow, VisitType};
use crate::shared::types::BadgeVariant;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisitResponseDto {
    pub id: Uuid,
    pub establishment: EstablishmentSummaryDto,
    pub scheduled_date: DateTime<Utc>,
    pub visit_type: VisitType,
    pub visit_type_label: String,
    pub visit_type_short_label: String,
    pub visit_type_badge: BadgeVariant,
    pub consultant: Option<UserSummaryDto>,
    pub notes: Option<String>,
    pub report_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VisitRow> for VisitResponseDto {
    fn from(row: VisitRow) -> Self {
        let VisitRow {
            visit: v,
            establishment_name,
            establishment_address,
            consultant_name,
        } = row;

        let consultant = match (v.consultant_id, consultant_name) {
            (Some(id), Some(full_name)) => Some(UserSummaryDto { id, full_name }),
            _ => None,
        };

        Self {
            id: v.id,
            establishment: EstablishmentSummaryDto::with_address(
                v.establishment_id,
                establishment_name,
                establishment_address,
            ),
            scheduled_date: v.scheduled_date,
            visit_type_label: v.visit_type.label().to_string(),
            visit_type_short_label: v.visit_type.short_label().to_string(),
            visit_type_badge: v.visit_type.badge(),
            visit_type: v.visit_type,
            consultant,
            notes: v.notes,
            report_url: v.report_url,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVisitDto {
    pub establishment_id: Uuid,
    pub scheduled_date: DateTime<Utc>,
    pub visit_type: VisitType,
    pub consultant_id: Option<String>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVisitDto {
    pub scheduled_date: Option<DateTime<Utc>>,
    pub visit_type: Option<VisitType>,
    pub consultant_id: Option<String>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}
